//! Template-free generic document
//!
//! The terminal fallback in the generation chain: a flowing vertical layout
//! over a fresh A4 page that renders whatever payload fields are present.
//! It has no error path for missing data: absent values simply shorten the
//! output, and a missing logo never blocks the document.

use crate::payload::TextData;
use crate::Result;
use pdf_core::{
    image_dimensions, wrap_text, BuiltinFont, Color, PdfDocument, A4_HEIGHT, A4_WIDTH,
};

const MARGIN: f64 = 50.0;
const LABEL_X: f64 = 50.0;
const VALUE_X: f64 = 170.0;
/// Vertical step per single-line field.
const LINE_STEP: f64 = 18.0;
/// Vertical step per wrapped value line.
const WRAP_STEP: f64 = 15.0;
/// Values longer than this are word-wrapped.
const WRAP_THRESHOLD: usize = 60;
const LOGO_WIDTH: f64 = 150.0;

/// Builder for the universal key-value layout.
#[derive(Debug, Clone)]
pub struct GenericDocument {
    title: String,
    organization: String,
    logo: Option<Vec<u8>>,
}

impl Default for GenericDocument {
    fn default() -> Self {
        Self {
            title: "DOCUMENTO MÉDICO".to_string(),
            organization: "Clinidoc - Registro Clínico".to_string(),
            logo: None,
        }
    }
}

impl GenericDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Logo image (JPEG or PNG) drawn centered above the title.
    pub fn with_logo(mut self, logo: Vec<u8>) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Build the document for `doc_type` from whatever `data` contains.
    pub fn build(&self, doc_type: &str, data: &TextData) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new_blank(A4_WIDTH, A4_HEIGHT);
        let bold = BuiltinFont::HelveticaBold;
        let regular = BuiltinFont::Helvetica;
        let blue = Color::rgb(0.2, 0.4, 0.8);

        let mut y = A4_HEIGHT - MARGIN;

        if let Some(logo) = &self.logo {
            match self.place_logo(&mut doc, logo) {
                Ok(logo_height) => y = A4_HEIGHT - logo_height - 50.0,
                Err(_) => {
                    tracing::warn!(target: "template", "could not embed logo, skipping");
                }
            }
        }

        doc.draw_text(&self.title, 0, MARGIN, y, bold, 18.0, Color::black())?;
        y -= 25.0;

        doc.draw_text(
            &format!("Tipo: {doc_type}"),
            0,
            MARGIN,
            y,
            bold,
            14.0,
            Color::gray(0.3),
        )?;
        y -= 15.0;

        doc.draw_line(0, MARGIN, y, A4_WIDTH - MARGIN, y, 2.0, blue)?;
        y -= 30.0;

        // Patient
        doc.draw_text("DATOS DEL PACIENTE", 0, MARGIN, y, bold, 12.0, blue)?;
        y -= 20.0;

        let prevision = non_empty(data, "prevision").or_else(|| non_empty(data, "isapre"));
        let patient_rows = [
            ("Nombre", non_empty(data, "nombreCompleto")),
            ("RUT", non_empty(data, "rut")),
            ("Fecha Nacimiento", non_empty(data, "fechaNac")),
            ("Previsión", prevision),
        ];
        for (label, value) in patient_rows {
            if let Some(value) = value {
                self.field_row(&mut doc, &mut y, label, value)?;
            }
        }

        y -= 15.0;
        doc.draw_line(0, MARGIN, y, A4_WIDTH - MARGIN, y, 1.0, Color::gray(0.8))?;
        y -= 20.0;

        // Facility
        let clinica = non_empty(data, "clinica");
        let direccion = non_empty(data, "direccionClinica");
        if clinica.is_some() || direccion.is_some() {
            doc.draw_text("ESTABLECIMIENTO", 0, MARGIN, y, bold, 12.0, blue)?;
            y -= 20.0;

            if let Some(value) = clinica {
                self.field_row(&mut doc, &mut y, "Clínica", value)?;
            }
            if let Some(value) = direccion {
                self.field_row(&mut doc, &mut y, "Dirección", value)?;
            }

            y -= 15.0;
            doc.draw_line(0, MARGIN, y, A4_WIDTH - MARGIN, y, 1.0, Color::gray(0.8))?;
            y -= 20.0;
        }

        // Medical information
        doc.draw_text("INFORMACIÓN MÉDICA", 0, MARGIN, y, bold, 12.0, blue)?;
        y -= 20.0;

        let medical_rows = [
            ("Diagnóstico", "diagnostico"),
            ("Código CIE-10", "codigoCie10"),
            ("Procedimiento", "procedimiento"),
            ("Código FONASA", "codigoFonasa"),
            ("Lateralidad", "lateralidad"),
            ("Fecha Cirugía", "fechaCirugia"),
            ("Tratamiento", "tratamiento"),
        ];
        for (label, key) in medical_rows {
            if let Some(value) = non_empty(data, key) {
                self.field_row(&mut doc, &mut y, label, value)?;
            }
        }

        // Care team
        if non_empty(data, "cirujano").is_some() || non_empty(data, "anestesista").is_some() {
            y -= 15.0;
            doc.draw_line(0, MARGIN, y, A4_WIDTH - MARGIN, y, 1.0, Color::gray(0.8))?;
            y -= 20.0;

            doc.draw_text("EQUIPO MÉDICO", 0, MARGIN, y, bold, 12.0, blue)?;
            y -= 20.0;

            let team_rows = [
                ("Cirujano", "cirujano"),
                ("RUT Cirujano", "rutCirujano"),
                ("Anestesista", "anestesista"),
                ("Arsenalera", "arsenalera"),
                ("Ayudante 1", "ayudante1"),
                ("Ayudante 2", "ayudante2"),
            ];
            for (label, key) in team_rows {
                if let Some(value) = non_empty(data, key) {
                    self.field_row(&mut doc, &mut y, label, value)?;
                }
            }
        }

        // Clinical alerts
        let mut alerts = Vec::new();
        if data.get("alergiaLatex").map(String::as_str) == Some("Si") {
            alerts.push("Alergia Látex");
        }
        if data.get("requiereBiopsia").map(String::as_str) == Some("Si") {
            alerts.push("Requiere Biopsia");
        }
        if data.get("requiereRayos").map(String::as_str) == Some("Si") {
            alerts.push("Requiere Rayos X");
        }
        if !alerts.is_empty() {
            y -= 10.0;
            doc.draw_text("Alertas:", 0, MARGIN, y, bold, 11.0, Color::rgb(0.8, 0.0, 0.0))?;
            doc.draw_text(
                &alerts.join(" | "),
                0,
                130.0,
                y,
                regular,
                11.0,
                Color::rgb(0.8, 0.0, 0.0),
            )?;
            y -= LINE_STEP;
        }

        // Risks (consent documents)
        if let Some(riesgos) = non_empty(data, "riesgos") {
            y -= 15.0;
            doc.draw_line(0, MARGIN, y, A4_WIDTH - MARGIN, y, 1.0, Color::gray(0.8))?;
            y -= 20.0;

            doc.draw_text("RIESGOS Y COMPLICACIONES", 0, MARGIN, y, bold, 12.0, blue)?;
            y -= 20.0;

            for line in wrap_text(riesgos, regular, 10.0, A4_WIDTH - 100.0) {
                doc.draw_text(&line, 0, MARGIN, y, regular, 10.0, Color::black())?;
                y -= 14.0;
            }
        }

        // Footer
        let generated = data
            .get("fechaActual")
            .cloned()
            .unwrap_or_else(|| chrono::Local::now().format("%d/%m/%Y").to_string());
        doc.draw_text(
            &format!("Generado: {generated}"),
            0,
            MARGIN,
            40.0,
            regular,
            9.0,
            Color::gray(0.5),
        )?;
        doc.draw_text(
            &self.organization,
            0,
            MARGIN,
            25.0,
            regular,
            9.0,
            Color::gray(0.5),
        )?;

        Ok(doc.to_bytes()?)
    }

    /// Draw the logo centered at the top, fit to `LOGO_WIDTH`, and return its
    /// rendered height.
    fn place_logo(&self, doc: &mut PdfDocument, logo: &[u8]) -> Result<f64> {
        let (width, height) = image_dimensions(logo)?;
        if width == 0 {
            return Err(pdf_core::PdfError::Image("zero-width logo".to_string()).into());
        }

        let logo_height = f64::from(height) / f64::from(width) * LOGO_WIDTH;
        doc.draw_image(
            logo,
            0,
            (A4_WIDTH - LOGO_WIDTH) / 2.0,
            A4_HEIGHT - logo_height - 30.0,
            LOGO_WIDTH,
            logo_height,
        )?;
        Ok(logo_height)
    }

    /// One labeled row: bold label in the left column, value in the second
    /// column, long values wrapped against the usable width.
    fn field_row(
        &self,
        doc: &mut PdfDocument,
        y: &mut f64,
        label: &str,
        value: &str,
    ) -> Result<()> {
        let bold = BuiltinFont::HelveticaBold;
        let regular = BuiltinFont::Helvetica;

        doc.draw_text(
            &format!("{label}:"),
            0,
            LABEL_X,
            *y,
            bold,
            11.0,
            Color::black(),
        )?;

        if value.len() > WRAP_THRESHOLD {
            for line in wrap_text(value, regular, 11.0, A4_WIDTH - VALUE_X - MARGIN) {
                doc.draw_text(&line, 0, VALUE_X, *y, regular, 11.0, Color::black())?;
                *y -= WRAP_STEP;
            }
        } else {
            doc.draw_text(value, 0, VALUE_X, *y, regular, 11.0, Color::black())?;
            *y -= LINE_STEP;
        }

        Ok(())
    }
}

fn non_empty<'a>(data: &'a TextData, key: &str) -> Option<&'a str> {
    data.get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}
