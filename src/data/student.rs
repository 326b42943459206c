use crate::data::{ColumnValue, Columns, Id, Messages, NoFilter, Resource};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id_alumno: Id,
    pub nombre: String,
    pub apellido: String,
    pub dni: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub direccion: Option<String>,
    pub id_curso: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentPayload {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub dni: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub direccion: Option<String>,
    pub id_curso: Option<i32>,
}

impl Columns for StudentPayload {
    fn columns(&self) -> Vec<(&'static str, ColumnValue)> {
        vec![
            ("nombre", ColumnValue::Text(self.nombre.clone())),
            ("apellido", ColumnValue::Text(self.apellido.clone())),
            ("dni", ColumnValue::Text(self.dni.clone())),
            ("email", ColumnValue::Text(self.email.clone())),
            ("telefono", ColumnValue::Text(self.telefono.clone())),
            ("fecha_nacimiento", ColumnValue::Date(self.fecha_nacimiento)),
            ("direccion", ColumnValue::Text(self.direccion.clone())),
            ("id_curso", ColumnValue::Int(self.id_curso)),
        ]
    }
}

impl Resource for Student {
    type Record = Self;
    type Payload = StudentPayload;
    type Filter = NoFilter;

    const PATH: &'static str = "/alumno";
    const TABLE: &'static str = "public.alumno";
    const ID_COLUMN: &'static str = "id_alumno";
    const SELECT: &'static str = "SELECT al.* FROM public.alumno al";
    const QUALIFIED_ID: &'static str = "al.id_alumno";
    const REQUIRED: &'static [&'static str] = &["nombre", "apellido", "dni"];
    const MESSAGES: Messages = Messages {
        list_failed: "Error al obtener los datos",
        get_failed: "Error al obtener el alumno",
        create_failed: "Error al guardar el alumno",
        update_failed: "Error al actualizar el alumno",
        delete_failed: "Error al eliminar el alumno",
        not_found: "Alumno no encontrado",
        created: "Alumno agregado correctamente",
        updated: "Alumno actualizado correctamente",
        deleted: "Alumno eliminado correctamente",
    };
}
