//! Runtime payload types and domain adapters
//!
//! Payloads are flat maps built fresh for each generation call from upstream
//! entity data; the engine looks keys up verbatim against the mapping's field
//! names and never persists them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text payload: field name -> value.
pub type TextData = BTreeMap<String, String>;

/// Checkbox payload: field name -> selected value.
pub type CheckboxData = BTreeMap<String, CheckValue>;

/// A checkbox runtime value. Upstream callers send booleans for binary
/// toggles and strings for option selections; both appear in the same map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for CheckValue {
    fn from(value: bool) -> Self {
        CheckValue::Bool(value)
    }
}

impl From<&str> for CheckValue {
    fn from(value: &str) -> Self {
        CheckValue::Text(value.to_string())
    }
}

impl From<String> for CheckValue {
    fn from(value: String) -> Self {
        CheckValue::Text(value)
    }
}

/// Unified patient/event record used by the built-in template adapters.
///
/// Field names mirror the upstream clinical record; everything is optional
/// and adapters fill in the template-specific fallback chains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnifiedPatientData {
    // Personal data
    pub nombre_completo: Option<String>,
    pub nombre: Option<String>,
    pub apellidos: Option<String>,
    pub rut: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub edad: Option<u32>,
    pub telefono: Option<String>,

    // Medical data
    pub diagnostico: Option<String>,
    pub procedimiento: Option<String>,
    pub cirugia_propuesta: Option<String>,
    pub codigo_cirugia: Option<String>,
    pub duracion_estimada: Option<String>,

    // Scheduling
    pub fecha_solicitada: Option<String>,
    pub fecha: Option<String>,
    pub horario: Option<String>,
    #[serde(rename = "puntajeETE")]
    pub puntaje_ete: Option<String>,

    // Care team
    pub cirujano: Option<String>,
    pub ayudante: Option<String>,
    pub anestesista: Option<String>,
    pub arsenalera: Option<String>,
    pub medico_responsable: Option<String>,
    pub medico_responsable_rut: Option<String>,

    // Coverage
    pub prevision: Option<String>,
    pub convenio: Option<String>,

    // Clinical options
    pub lateralidad: Option<String>,
    pub alergias_latex: Option<String>,
    pub biopsia: Option<String>,
    pub rayos_x: Option<String>,
}

impl UnifiedPatientData {
    /// Flatten into the payload expected by the surgical-room request layout.
    pub fn to_solicitud_pabellon_data(&self) -> (TextData, CheckboxData) {
        let nombre_paciente = self.nombre_completo.clone().unwrap_or_else(|| {
            format!(
                "{} {}",
                self.nombre.as_deref().unwrap_or(""),
                self.apellidos.as_deref().unwrap_or("")
            )
            .trim()
            .to_string()
        });

        let mut text = TextData::new();
        text.insert("nombrePaciente".into(), nombre_paciente);
        text.insert("rutPaciente".into(), self.rut.clone().unwrap_or_default());
        text.insert(
            "fechaNacimiento".into(),
            self.fecha_nacimiento.clone().unwrap_or_default(),
        );
        text.insert(
            "telefonoPaciente".into(),
            self.telefono.clone().unwrap_or_default(),
        );
        text.insert(
            "fechaSolicitada".into(),
            self.fecha_solicitada
                .clone()
                .or_else(|| self.fecha.clone())
                .unwrap_or_default(),
        );
        text.insert("horario".into(), self.horario.clone().unwrap_or_default());
        text.insert(
            "diagnostico".into(),
            self.diagnostico.clone().unwrap_or_default(),
        );
        text.insert(
            "cirugiaPropuesta".into(),
            self.cirugia_propuesta
                .clone()
                .or_else(|| self.procedimiento.clone())
                .unwrap_or_default(),
        );
        text.insert(
            "codigoCirugia".into(),
            self.codigo_cirugia.clone().unwrap_or_default(),
        );
        text.insert(
            "duracionEstimada".into(),
            self.duracion_estimada.clone().unwrap_or_default(),
        );
        text.insert(
            "puntajeETE".into(),
            self.puntaje_ete.clone().unwrap_or_default(),
        );
        text.insert("cirujano".into(), self.cirujano.clone().unwrap_or_default());
        text.insert("ayudante".into(), self.ayudante.clone().unwrap_or_default());
        text.insert(
            "anestesista".into(),
            self.anestesista.clone().unwrap_or_default(),
        );
        text.insert(
            "arsenalera".into(),
            self.arsenalera.clone().unwrap_or_default(),
        );
        text.insert(
            "prevision".into(),
            self.prevision.clone().unwrap_or_default(),
        );

        let mut checkboxes = CheckboxData::new();
        checkboxes.insert(
            "lateralidad".into(),
            self.lateralidad.clone().unwrap_or_default().into(),
        );
        checkboxes.insert(
            "alergiasLatex".into(),
            self.alergias_latex.clone().unwrap_or_default().into(),
        );
        checkboxes.insert(
            "biopsia".into(),
            self.biopsia.clone().unwrap_or_default().into(),
        );
        checkboxes.insert(
            "rayosX".into(),
            self.rayos_x.clone().unwrap_or_default().into(),
        );
        checkboxes.insert(
            "convenio".into(),
            self.convenio.clone().unwrap_or_default().into(),
        );

        (text, checkboxes)
    }

    /// Flatten into the payload expected by the general consent layout.
    pub fn to_consentimiento_data(&self) -> (TextData, CheckboxData) {
        let nombre = self
            .nombre
            .clone()
            .or_else(|| {
                self.nombre_completo
                    .as_ref()
                    .and_then(|full| full.split_whitespace().next().map(str::to_string))
            })
            .unwrap_or_default();
        let apellidos = self
            .apellidos
            .clone()
            .or_else(|| {
                self.nombre_completo.as_ref().map(|full| {
                    full.split_whitespace()
                        .skip(1)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
            })
            .unwrap_or_default();

        let mut text = TextData::new();
        text.insert("nombrePaciente".into(), nombre.clone());
        text.insert("apellidosPaciente".into(), apellidos.clone());
        text.insert("rutPaciente".into(), self.rut.clone().unwrap_or_default());
        text.insert(
            "edadPaciente".into(),
            self.edad.map(|e| e.to_string()).unwrap_or_default(),
        );
        text.insert(
            "fechaNacimiento".into(),
            self.fecha_nacimiento.clone().unwrap_or_default(),
        );
        text.insert(
            "diagnostico".into(),
            self.diagnostico.clone().unwrap_or_default(),
        );
        text.insert(
            "procedimiento".into(),
            self.procedimiento
                .clone()
                .or_else(|| self.cirugia_propuesta.clone())
                .unwrap_or_default(),
        );
        text.insert("nombreAutorizacion".into(), nombre);
        text.insert("apellidosAutorizacion".into(), apellidos);
        text.insert(
            "rutAutorizacion".into(),
            self.rut.clone().unwrap_or_default(),
        );
        text.insert(
            "medicoResponsableNombre".into(),
            self.medico_responsable
                .clone()
                .or_else(|| self.cirujano.clone())
                .unwrap_or_default(),
        );
        text.insert(
            "medicoResponsableRut".into(),
            self.medico_responsable_rut.clone().unwrap_or_default(),
        );
        text.insert(
            "fechaConsentimiento".into(),
            self.fecha
                .clone()
                .or_else(|| self.fecha_solicitada.clone())
                .unwrap_or_default(),
        );

        (text, CheckboxData::new())
    }
}
