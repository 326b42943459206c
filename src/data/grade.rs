use crate::data::{ColumnValue, Columns, Id, Messages, NoFilter, Resource, empty_as_none};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Grade {
    pub id_calificacion: Id,
    pub fecha: NaiveDate,
    pub nota: f64,
    pub materia: String,
    pub observaciones: Option<String>,
    pub id_alumno: Id,
    pub alumno_nombre_completo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradePayload {
    pub fecha: Option<NaiveDate>,
    pub nota: Option<f64>,
    pub materia: Option<String>,
    // blank remarks are stored as NULL
    #[serde(default, deserialize_with = "empty_as_none")]
    pub observaciones: Option<String>,
    pub id_alumno: Option<Id>,
}

impl Columns for GradePayload {
    fn columns(&self) -> Vec<(&'static str, ColumnValue)> {
        vec![
            ("fecha", ColumnValue::Date(self.fecha)),
            ("nota", ColumnValue::Float(self.nota)),
            ("materia", ColumnValue::Text(self.materia.clone())),
            ("observaciones", ColumnValue::Text(self.observaciones.clone())),
            ("id_alumno", ColumnValue::Int(self.id_alumno)),
        ]
    }
}

impl Resource for Grade {
    type Record = Self;
    type Payload = GradePayload;
    type Filter = NoFilter;

    const PATH: &'static str = "/calificaciones";
    const TABLE: &'static str = "public.calificacion";
    const ID_COLUMN: &'static str = "id_calificacion";
    // `||` rather than CONCAT so a missing student gives NULL instead of " "
    const SELECT: &'static str = "SELECT c.id_calificacion, c.fecha, c.nota, c.materia, c.observaciones, c.id_alumno, \
        al.nombre || ' ' || al.apellido AS alumno_nombre_completo \
        FROM public.calificacion c LEFT JOIN public.alumno al ON c.id_alumno = al.id_alumno";
    const QUALIFIED_ID: &'static str = "c.id_calificacion";
    const ORDER_BY: Option<&'static str> = Some("c.fecha DESC, c.materia ASC");
    const REQUIRED: &'static [&'static str] = &["fecha", "nota", "materia", "id_alumno"];
    const MESSAGES: Messages = Messages {
        list_failed: "Error al obtener calificaciones",
        get_failed: "Error al obtener calificación",
        create_failed: "Error al guardar calificación",
        update_failed: "Error al actualizar calificación",
        delete_failed: "Error al eliminar calificación",
        not_found: "Calificación no encontrada",
        created: "Calificación registrada correctamente",
        updated: "Calificación actualizada correctamente",
        deleted: "Calificación eliminada correctamente",
    };
}
