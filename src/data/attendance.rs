use crate::data::{ColumnValue, Columns, Id, Messages, Resource, empty_as_none};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id_asistencia: Id,
    pub fecha: NaiveDate,
    pub estado: String,
    pub id_alumno: Id,
    pub id_curso: i32,
    // from the student join, null when the student is gone
    pub alumno_nombre: Option<String>,
    pub alumno_apellido: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendancePayload {
    pub fecha: Option<NaiveDate>,
    pub estado: Option<String>,
    pub id_alumno: Option<Id>,
    pub id_curso: Option<i32>,
}

impl Columns for AttendancePayload {
    fn columns(&self) -> Vec<(&'static str, ColumnValue)> {
        vec![
            ("fecha", ColumnValue::Date(self.fecha)),
            ("estado", ColumnValue::Text(self.estado.clone())),
            ("id_alumno", ColumnValue::Int(self.id_alumno)),
            ("id_curso", ColumnValue::Int(self.id_curso)),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id_curso: Option<i32>,
}

impl AttendanceFilter {
    /// The course to restrict to. Empty and `0` both mean every course.
    pub fn course(&self) -> Option<i32> {
        self.id_curso.filter(|&id_curso| id_curso != 0)
    }
}

impl Columns for AttendanceFilter {
    fn columns(&self) -> Vec<(&'static str, ColumnValue)> {
        self.course()
            .map(|id_curso| ("a.id_curso", ColumnValue::Int(Some(id_curso))))
            .into_iter()
            .collect()
    }
}

impl Resource for Attendance {
    type Record = Self;
    type Payload = AttendancePayload;
    type Filter = AttendanceFilter;

    const PATH: &'static str = "/asistencia";
    const TABLE: &'static str = "public.asistencia";
    const ID_COLUMN: &'static str = "id_asistencia";
    const SELECT: &'static str = "SELECT a.*, al.nombre AS alumno_nombre, al.apellido AS alumno_apellido \
        FROM public.asistencia a LEFT JOIN public.alumno al ON a.id_alumno = al.id_alumno";
    const QUALIFIED_ID: &'static str = "a.id_asistencia";
    const REQUIRED: &'static [&'static str] = &["fecha", "estado", "id_alumno", "id_curso"];
    const MESSAGES: Messages = Messages {
        list_failed: "Error al obtener asistencias",
        get_failed: "Error al obtener la asistencia",
        create_failed: "Error al guardar asistencia",
        update_failed: "Error al actualizar asistencia",
        delete_failed: "Error al eliminar asistencia",
        not_found: "Asistencia no encontrada",
        created: "Asistencia registrada correctamente",
        updated: "Asistencia actualizada correctamente",
        deleted: "Asistencia eliminada correctamente",
    };
}
