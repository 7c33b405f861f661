//! Template mapping registry
//!
//! Static lookup from a template identifier (typically the PDF filename) to
//! its coordinate layout. Several identifiers may alias the same layout, so
//! both the canonical filename and the clinic-scoped name resolve to one
//! mapping. The registry itself is supplied by configuration/code, not
//! mutated at runtime; `insert`/`alias` exist for tests and
//! deployment-specific layouts.

use crate::schema::{CheckPoint, CheckboxSlot, FieldMapping, TemplateMapping};
use std::collections::BTreeMap;

/// Identifier -> layout lookup with alias support.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    mappings: BTreeMap<String, TemplateMapping>,
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the production layouts.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();

        registry.insert("solicitud_de_pabellon__2_.pdf", solicitud_pabellon_mapping());
        registry.alias("solicitud_de_pabellon__2_.pdf", "pabellon/bupa.pdf");

        registry.insert(
            "cba_consentimiento_general.pdf",
            consentimiento_general_mapping(),
        );
        registry.alias("cba_consentimiento_general.pdf", "consentimiento/bupa.pdf");

        registry
    }

    pub fn insert(&mut self, name: impl Into<String>, mapping: TemplateMapping) {
        self.mappings.insert(name.into(), mapping);
    }

    /// Register `alias` as another name for an existing entry.
    ///
    /// Returns false when there is nothing to alias.
    pub fn alias(&mut self, existing: &str, alias: impl Into<String>) -> bool {
        match self.mappings.get(existing).cloned() {
            Some(mapping) => {
                self.mappings.insert(alias.into(), mapping);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&TemplateMapping> {
        self.mappings.get(name)
    }

    /// All registered identifiers, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.mappings.keys().map(String::as_str).collect()
    }
}

/// Surgical-room request, Clínica Bupa Antofagasta.
///
/// Template `solicitud_de_pabellon__2_.pdf`, single page. Y coordinates are
/// PDF space (bottom-left origin) on an A4 page.
pub fn solicitud_pabellon_mapping() -> TemplateMapping {
    let text = vec![
        // Patient data
        FieldMapping::new("nombrePaciente", 120.0, 760.0)
            .font_size(10.0)
            .max_width(250.0),
        FieldMapping::new("rutPaciente", 400.0, 760.0).font_size(10.0),
        FieldMapping::new("fechaNacimiento", 120.0, 740.0).font_size(10.0),
        FieldMapping::new("telefonoPaciente", 300.0, 740.0).font_size(10.0),
        // Surgery data
        FieldMapping::new("fechaSolicitada", 120.0, 700.0).font_size(10.0),
        FieldMapping::new("horario", 300.0, 700.0).font_size(10.0),
        FieldMapping::new("diagnostico", 120.0, 660.0)
            .font_size(9.0)
            .max_width(400.0),
        FieldMapping::new("cirugiaPropuesta", 120.0, 620.0)
            .font_size(9.0)
            .max_width(400.0),
        FieldMapping::new("codigoCirugia", 120.0, 600.0).font_size(9.0),
        FieldMapping::new("duracionEstimada", 350.0, 600.0).font_size(9.0),
        // Clinical data
        FieldMapping::new("puntajeETE", 450.0, 560.0).font_size(10.0),
        // Care team
        FieldMapping::new("cirujano", 120.0, 480.0)
            .font_size(10.0)
            .max_width(200.0),
        FieldMapping::new("ayudante", 120.0, 460.0)
            .font_size(10.0)
            .max_width(200.0),
        FieldMapping::new("anestesista", 120.0, 440.0)
            .font_size(10.0)
            .max_width(200.0),
        FieldMapping::new("arsenalera", 120.0, 420.0)
            .font_size(10.0)
            .max_width(200.0),
        // Coverage
        FieldMapping::new("prevision", 120.0, 380.0).font_size(10.0),
    ];

    let mut checkboxes = BTreeMap::new();
    checkboxes.insert(
        "lateralidad".to_string(),
        CheckboxSlot::options([
            ("derecha", CheckPoint::at(120.0, 580.0)),
            ("izquierda", CheckPoint::at(200.0, 580.0)),
            ("bilateral", CheckPoint::at(280.0, 580.0)),
            ("no aplica", CheckPoint::at(360.0, 580.0)),
        ]),
    );
    checkboxes.insert(
        "alergiasLatex".to_string(),
        CheckboxSlot::options([
            ("si", CheckPoint::at(120.0, 560.0)),
            ("no", CheckPoint::at(180.0, 560.0)),
        ]),
    );
    checkboxes.insert(
        "biopsia".to_string(),
        CheckboxSlot::options([
            ("no", CheckPoint::at(120.0, 540.0)),
            ("si", CheckPoint::at(160.0, 540.0)),
            ("diferida", CheckPoint::at(200.0, 540.0)),
            ("rapida", CheckPoint::at(260.0, 540.0)),
        ]),
    );
    checkboxes.insert(
        "rayosX".to_string(),
        CheckboxSlot::options([
            ("si", CheckPoint::at(120.0, 520.0)),
            ("no", CheckPoint::at(180.0, 520.0)),
        ]),
    );
    checkboxes.insert(
        "convenio".to_string(),
        CheckboxSlot::options([
            ("PAD", CheckPoint::at(120.0, 360.0)),
            ("GES", CheckPoint::at(180.0, 360.0)),
            ("CAE", CheckPoint::at(240.0, 360.0)),
            ("SIP", CheckPoint::at(300.0, 360.0)),
            ("LIBRE ELECCION", CheckPoint::at(360.0, 360.0)),
        ]),
    );

    TemplateMapping { text, checkboxes }
}

/// General consent form, Clínica Bupa Antofagasta.
///
/// Template `cba_consentimiento_general.pdf`, 3 pages; patient data on page
/// 0 and the authorization block on page 2. Signature areas are handled on
/// paper, so there are no checkboxes.
pub fn consentimiento_general_mapping() -> TemplateMapping {
    let text = vec![
        // Page 0: patient data
        FieldMapping::new("nombrePaciente", 180.0, 750.0)
            .font_size(11.0)
            .max_width(300.0),
        FieldMapping::new("apellidosPaciente", 180.0, 730.0)
            .font_size(11.0)
            .max_width(300.0),
        FieldMapping::new("rutPaciente", 180.0, 710.0).font_size(11.0),
        FieldMapping::new("edadPaciente", 180.0, 690.0).font_size(11.0),
        FieldMapping::new("fechaNacimiento", 300.0, 690.0).font_size(11.0),
        FieldMapping::new("diagnostico", 180.0, 650.0)
            .font_size(10.0)
            .max_width(350.0),
        FieldMapping::new("procedimiento", 180.0, 610.0)
            .font_size(10.0)
            .max_width(350.0),
        // Page 2: authorization
        FieldMapping::new("nombreAutorizacion", 180.0, 400.0)
            .font_size(11.0)
            .max_width(300.0)
            .page(2),
        FieldMapping::new("apellidosAutorizacion", 180.0, 380.0)
            .font_size(11.0)
            .max_width(300.0)
            .page(2),
        FieldMapping::new("rutAutorizacion", 180.0, 360.0)
            .font_size(11.0)
            .page(2),
        FieldMapping::new("medicoResponsableNombre", 180.0, 280.0)
            .font_size(11.0)
            .max_width(250.0)
            .page(2),
        FieldMapping::new("medicoResponsableRut", 180.0, 260.0)
            .font_size(11.0)
            .page(2),
        FieldMapping::new("fechaConsentimiento", 180.0, 200.0)
            .font_size(10.0)
            .page(2),
    ];

    TemplateMapping {
        text,
        checkboxes: BTreeMap::new(),
    }
}
