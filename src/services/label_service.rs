// src/services/label_service.rs

use image::{DynamicImage, ImageOutputFormat, Luma};
use qrcode::QrCode;
use uuid::Uuid;

use crate::{common::error::AppError, models::tool::Tool};

/// Conteúdo padrão da etiqueta quando a ferramenta não tem `qr_code` próprio.
pub fn default_label_payload(tool_id: Uuid) -> String {
    format!("canteiro:tool:{tool_id}")
}

/// Gera etiquetas QR (PNG) para colar nas ferramentas.
#[derive(Clone)]
pub struct LabelService {
    min_size: u32,
}

impl Default for LabelService {
    fn default() -> Self {
        Self { min_size: 256 }
    }
}

impl LabelService {
    pub fn label_payload(tool: &Tool) -> String {
        tool.qr_code
            .clone()
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| default_label_payload(tool.id))
    }

    pub fn render_png(&self, payload: &str) -> Result<Vec<u8>, AppError> {
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let image_buffer = code
            .render::<Luma<u8>>()
            .min_dimensions(self.min_size, self.min_size)
            .build();

        let mut buffer = Vec::new();
        DynamicImage::ImageLuma8(image_buffer)
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movement::fixtures::tool;
    use crate::models::tool::ToolStatus;
    use image::GenericImageView;

    #[test]
    fn renders_a_png_of_at_least_the_minimum_size() {
        let png = LabelService::default()
            .render_png(&default_label_payload(Uuid::nil()))
            .unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.dimensions().0 >= 256);
    }

    #[test]
    fn payload_prefers_the_stored_code() {
        let id = Uuid::new_v4();
        let mut t = tool(id, ToolStatus::Disponivel);
        assert_eq!(LabelService::label_payload(&t), format!("canteiro:tool:{id}"));

        t.qr_code = Some("ETQ-0042".into());
        assert_eq!(LabelService::label_payload(&t), "ETQ-0042");
    }
}
