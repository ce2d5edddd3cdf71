use base64::Engine as _;

/// System instructions sent with every extraction request.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are an expert system for analysing Colombian legal and financial documents.
Your task is:
1) Identify the document type, one of:
   - CEDULA (national identity card)
   - ACTA_SEGURO (insurance policy certificate)
   - CONTRATO (contract)
2) Extract the structured fields defined for that document type.
3) ALWAYS return a single JSON object with EXACTLY this shape:

{
  "doc_type": "CEDULA" | "ACTA_SEGURO" | "CONTRATO",
  "cedula": {
    "numero": string,
    "apellidos": string,
    "nombres": string,
    "fecha_nacimiento": string | null,
    "lugar_nacimiento": string | null,
    "estatura_m": number | null,
    "grupo_sanguineo_rh": string | null,
    "sexo": string | null,
    "fecha_expedicion": string | null,
    "lugar_expedicion": string | null
  } | null,
  "acta_seguro": {
    "compania": string | null,
    "nit_compania": string | null,
    "direccion_compania": string | null,
    "numero_poliza": string,
    "ramo": string | null,
    "tomador_asegurado": string | null,
    "identificacion": string | null,
    "fecha_emision": string | null,
    "ciudad_emision": string | null,
    "fecha_inicio": string | null,
    "fecha_fin": string | null,
    "coberturas": [
      { "nombre": string, "monto": string | null }
    ],
    "estado_poliza": string | null
  } | null,
  "contrato": {
    "numero_contrato": string | null,
    "contratante_nombre": string | null,
    "contratante_nit": string | null,
    "contratista_nombre": string | null,
    "contratista_identificacion": string | null,
    "objeto": string | null,
    "valor_numerico": number | null,
    "valor_textual": string | null,
    "fecha_inicio": string | null,
    "fecha_fin": string | null,
    "duracion_meses": integer | null,
    "ciudad_firma": string | null,
    "fecha_firma": string | null,
    "clausulas_relevantes": string | null
  } | null
}

RULES:
- Keys for the other document types must be null.
- Return every date as YYYY-MM-DD, or null when it cannot be read.
- Return identification and policy numbers as strings.
- On identity cards pay special attention to height and blood group. They may
  appear as "ESTATURA: 1.65 M", "ESTATURA 1,65 M", "G.S. RH: O+" and similar.
    - estatura_m: number in meters (1.65 for "1.65 M" or "1,65 M").
    - grupo_sanguineo_rh: text such as "O+", "A-", "B+".
- Do not write anything outside the JSON.
"#;

/// First user block; precedes the evidence text and image.
pub const EXTRACTION_USER_INSTRUCTIONS: &str = "Analyse the following document (text, and image when available). \
Remember to return ONLY valid JSON following the structure given.";

/// One ordered piece of the user message.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    /// Base64-encoded image with its MIME type.
    Image { mime: &'static str, base64: String },
}

impl ContentBlock {
    /// `data:` URL form used by chat-completion APIs for inline images.
    pub fn data_url(&self) -> Option<String> {
        match self {
            Self::Image { mime, base64 } => Some(format!("data:{mime};base64,{base64}")),
            Self::Text(_) => None,
        }
    }
}

/// A single extraction request for the model service.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: String,
    pub blocks: Vec<ContentBlock>,
}

/// Image bytes together with the MIME type they are sent under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInput<'a> {
    pub bytes: &'a [u8],
    pub mime: &'static str,
}

impl<'a> ImageInput<'a> {
    /// Image whose type was already validated upstream.
    pub fn new(bytes: &'a [u8], mime: &'static str) -> Self {
        Self { bytes, mime }
    }

    /// Image without a declared type; the MIME is taken from magic bytes.
    pub fn sniffed(bytes: &'a [u8]) -> Self {
        Self::new(bytes, sniff_image_mime(bytes))
    }
}

/// Build the extraction request: instructions, then evidence text, then the
/// image. Empty text or image is left out.
pub fn build_extraction_request(raw_text: Option<&str>, image: Option<ImageInput<'_>>) -> ModelRequest {
    let mut blocks = vec![ContentBlock::Text(EXTRACTION_USER_INSTRUCTIONS.to_string())];

    if let Some(text) = raw_text.filter(|t| !t.is_empty()) {
        blocks.push(ContentBlock::Text(text.to_string()));
    }

    if let Some(image) = image.filter(|i| !i.bytes.is_empty()) {
        blocks.push(ContentBlock::Image {
            mime: image.mime,
            base64: base64::engine::general_purpose::STANDARD.encode(image.bytes),
        });
    }

    ModelRequest {
        system: EXTRACTION_SYSTEM_PROMPT.to_string(),
        blocks,
    }
}

/// MIME type from magic bytes. Only PNG and JPEG reach the pipeline; anything
/// that is not PNG is sent as JPEG.
pub fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn text_only_request() {
        let request = build_extraction_request(Some("REPUBLICA DE COLOMBIA"), None);
        assert_eq!(request.system, EXTRACTION_SYSTEM_PROMPT);
        assert_eq!(
            request.blocks,
            vec![
                ContentBlock::Text(EXTRACTION_USER_INSTRUCTIONS.into()),
                ContentBlock::Text("REPUBLICA DE COLOMBIA".into()),
            ]
        );
    }

    #[test]
    fn image_only_request_encodes_base64() {
        let request = build_extraction_request(None, Some(ImageInput::sniffed(PNG_HEADER)));
        assert_eq!(request.blocks.len(), 2);
        match &request.blocks[1] {
            ContentBlock::Image { mime, base64 } => {
                assert_eq!(*mime, "image/png");
                assert_eq!(base64, "iVBORw0KGgo=");
            }
            other => panic!("expected image block, got {other:?}"),
        }
    }

    #[test]
    fn text_precedes_image() {
        let request = build_extraction_request(Some("texto"), Some(ImageInput::sniffed(JPEG_HEADER)));
        assert!(matches!(request.blocks[1], ContentBlock::Text(_)));
        assert!(matches!(request.blocks[2], ContentBlock::Image { mime: "image/jpeg", .. }));
    }

    #[test]
    fn empty_inputs_are_skipped() {
        let empty: &[u8] = &[];
        let request = build_extraction_request(Some(""), Some(ImageInput::sniffed(empty)));
        assert_eq!(request.blocks.len(), 1);
    }

    #[test]
    fn declared_mime_is_used_as_given() {
        // PNG bytes declared as JPEG keep the declared type.
        let request = build_extraction_request(None, Some(ImageInput::new(PNG_HEADER, "image/jpeg")));
        assert!(matches!(request.blocks[1], ContentBlock::Image { mime: "image/jpeg", .. }));
    }

    #[test]
    fn sniffing_falls_back_to_jpeg() {
        assert_eq!(ImageInput::sniffed(PNG_HEADER).mime, "image/png");
        assert_eq!(ImageInput::sniffed(JPEG_HEADER).mime, "image/jpeg");
        assert_eq!(ImageInput::sniffed(b"GIF89a").mime, "image/jpeg");
    }

    #[test]
    fn data_url_only_for_images() {
        let image = ContentBlock::Image {
            mime: "image/jpeg",
            base64: "AAAA".into(),
        };
        assert_eq!(image.data_url().as_deref(), Some("data:image/jpeg;base64,AAAA"));
        assert_eq!(ContentBlock::Text("x".into()).data_url(), None);
    }

    #[test]
    fn system_prompt_lists_all_tags() {
        for tag in ["CEDULA", "ACTA_SEGURO", "CONTRATO"] {
            assert!(EXTRACTION_SYSTEM_PROMPT.contains(tag));
        }
    }
}
