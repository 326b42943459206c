//! In-memory [`Repository`] used by handler tests in place of Postgres.
//!
//! Mirrors the table constraints the handlers can observe: serial ids, `NOT NULL` columns,
//! the student left joins and the grade ordering.

use crate::data::{
    Id, NoFilter, Repository,
    attendance::{Attendance, AttendanceFilter, AttendancePayload},
    grade::{Grade, GradePayload},
    student::{Student, StudentPayload},
};
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

#[derive(Debug)]
struct Table<T> {
    next_id: Id,
    rows: BTreeMap<Id, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn insert(&mut self, row: impl FnOnce(Id) -> sqlx::Result<T>) -> sqlx::Result<Id> {
        let id = self.next_id;
        self.rows.insert(id, row(id)?);
        self.next_id += 1;
        Ok(id)
    }

    // constraints only bite on rows that actually match, like an UPDATE
    fn replace(&mut self, id: Id, row: impl FnOnce(Id) -> sqlx::Result<T>) -> sqlx::Result<u64> {
        match self.rows.get_mut(&id) {
            Some(existing) => {
                *existing = row(id)?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete(&mut self, id: Id) -> u64 {
        u64::from(self.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
struct Tables {
    students: Table<Student>,
    attendance: Table<Attendance>,
    grades: Table<Grade>,
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

fn not_null<T>(value: Option<T>, column: &str) -> sqlx::Result<T> {
    value.ok_or_else(|| {
        sqlx::Error::Protocol(format!(
            "null value in column \"{column}\" violates not-null constraint"
        ))
    })
}

impl MemoryRepository {
    /// Every later call fails as if the database were unreachable.
    pub fn fail_everything(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn tables(&self) -> sqlx::Result<MutexGuard<'_, Tables>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.tables.lock().unwrap())
    }

    pub fn student_count(&self) -> usize {
        self.tables.lock().unwrap().students.rows.len()
    }

    pub fn grade_count(&self) -> usize {
        self.tables.lock().unwrap().grades.rows.len()
    }

    pub fn attendance_count(&self) -> usize {
        self.tables.lock().unwrap().attendance.rows.len()
    }
}

impl Tables {
    fn join_attendance(&self, mut row: Attendance) -> Attendance {
        let student = self.students.rows.get(&row.id_alumno);
        row.alumno_nombre = student.map(|s| s.nombre.clone());
        row.alumno_apellido = student.map(|s| s.apellido.clone());
        row
    }

    fn join_grade(&self, mut row: Grade) -> Grade {
        row.alumno_nombre_completo = self
            .students
            .rows
            .get(&row.id_alumno)
            .map(|s| format!("{} {}", s.nombre, s.apellido));
        row
    }
}

fn student_row(id_alumno: Id, p: &StudentPayload) -> sqlx::Result<Student> {
    Ok(Student {
        id_alumno,
        nombre: not_null(p.nombre.clone(), "nombre")?,
        apellido: not_null(p.apellido.clone(), "apellido")?,
        dni: not_null(p.dni.clone(), "dni")?,
        email: p.email.clone(),
        telefono: p.telefono.clone(),
        fecha_nacimiento: p.fecha_nacimiento,
        direccion: p.direccion.clone(),
        id_curso: p.id_curso,
    })
}

fn attendance_row(id_asistencia: Id, p: &AttendancePayload) -> sqlx::Result<Attendance> {
    Ok(Attendance {
        id_asistencia,
        fecha: not_null(p.fecha, "fecha")?,
        estado: not_null(p.estado.clone(), "estado")?,
        id_alumno: not_null(p.id_alumno, "id_alumno")?,
        id_curso: not_null(p.id_curso, "id_curso")?,
        alumno_nombre: None,
        alumno_apellido: None,
    })
}

fn grade_row(id_calificacion: Id, p: &GradePayload) -> sqlx::Result<Grade> {
    Ok(Grade {
        id_calificacion,
        fecha: not_null(p.fecha, "fecha")?,
        nota: not_null(p.nota, "nota")?,
        materia: not_null(p.materia.clone(), "materia")?,
        observaciones: p.observaciones.clone(),
        id_alumno: not_null(p.id_alumno, "id_alumno")?,
        alumno_nombre_completo: None,
    })
}

#[async_trait]
impl Repository<Student> for MemoryRepository {
    async fn list(&self, _filter: &NoFilter) -> sqlx::Result<Vec<Student>> {
        Ok(self.tables()?.students.rows.values().cloned().collect())
    }

    async fn get(&self, id: Id) -> sqlx::Result<Option<Student>> {
        Ok(self.tables()?.students.rows.get(&id).cloned())
    }

    async fn insert(&self, payload: &StudentPayload) -> sqlx::Result<Id> {
        self.tables()?
            .students
            .insert(|id| student_row(id, payload))
    }

    async fn update(&self, id: Id, payload: &StudentPayload) -> sqlx::Result<u64> {
        self.tables()?
            .students
            .replace(id, |id| student_row(id, payload))
    }

    async fn delete(&self, id: Id) -> sqlx::Result<u64> {
        Ok(self.tables()?.students.delete(id))
    }
}

#[async_trait]
impl Repository<Attendance> for MemoryRepository {
    async fn list(&self, filter: &AttendanceFilter) -> sqlx::Result<Vec<Attendance>> {
        let tables = self.tables()?;
        Ok(tables
            .attendance
            .rows
            .values()
            .filter(|row| filter.course().is_none_or(|id_curso| row.id_curso == id_curso))
            .map(|row| tables.join_attendance(row.clone()))
            .collect())
    }

    async fn get(&self, id: Id) -> sqlx::Result<Option<Attendance>> {
        let tables = self.tables()?;
        Ok(tables
            .attendance
            .rows
            .get(&id)
            .map(|row| tables.join_attendance(row.clone())))
    }

    async fn insert(&self, payload: &AttendancePayload) -> sqlx::Result<Id> {
        self.tables()?
            .attendance
            .insert(|id| attendance_row(id, payload))
    }

    async fn update(&self, id: Id, payload: &AttendancePayload) -> sqlx::Result<u64> {
        self.tables()?
            .attendance
            .replace(id, |id| attendance_row(id, payload))
    }

    async fn delete(&self, id: Id) -> sqlx::Result<u64> {
        Ok(self.tables()?.attendance.delete(id))
    }
}

#[async_trait]
impl Repository<Grade> for MemoryRepository {
    async fn list(&self, _filter: &NoFilter) -> sqlx::Result<Vec<Grade>> {
        let tables = self.tables()?;
        let mut rows: Vec<_> = tables
            .grades
            .rows
            .values()
            .map(|row| tables.join_grade(row.clone()))
            .collect();
        rows.sort_by(|a, b| b.fecha.cmp(&a.fecha).then_with(|| a.materia.cmp(&b.materia)));
        Ok(rows)
    }

    async fn get(&self, id: Id) -> sqlx::Result<Option<Grade>> {
        let tables = self.tables()?;
        Ok(tables
            .grades
            .rows
            .get(&id)
            .map(|row| tables.join_grade(row.clone())))
    }

    async fn insert(&self, payload: &GradePayload) -> sqlx::Result<Id> {
        self.tables()?
            .grades
            .insert(|id| grade_row(id, payload))
    }

    async fn update(&self, id: Id, payload: &GradePayload) -> sqlx::Result<u64> {
        self.tables()?
            .grades
            .replace(id, |id| grade_row(id, payload))
    }

    async fn delete(&self, id: Id) -> sqlx::Result<u64> {
        Ok(self.tables()?.grades.delete(id))
    }
}
