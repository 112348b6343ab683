//! Student roster
//!
//! Students persisted in the `students` table, cached in memory.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use tutordesk_storage::{Database, Table};

use crate::error::SchedulingError;
use crate::student::Student;
use crate::Result;

pub struct StudentRoster {
    /// In-memory student cache
    students: Arc<RwLock<HashMap<String, Student>>>,
    /// Database for persistence
    db: Database,
}

impl StudentRoster {
    pub fn new(db: Database) -> Self {
        Self {
            students: Arc::new(RwLock::new(HashMap::new())),
            db,
        }
    }

    /// Load all students from the database into the cache
    pub fn load(&self) -> Result<usize> {
        let mut loaded = HashMap::new();
        for record in self.db.select(Table::Students)? {
            match record.parse::<Student>() {
                Ok(student) => {
                    loaded.insert(student.id.clone(), student);
                }
                Err(e) => {
                    tracing::warn!(id = %record.id, error = %e, "Skipping unreadable student record");
                }
            }
        }

        let count = loaded.len();
        *self.students.write() = loaded;

        tracing::info!(count, "Loaded students");

        Ok(count)
    }

    pub fn add(&self, student: Student) -> Result<Student> {
        self.db
            .insert(Table::Students, serde_json::to_value(&student)?)?;
        self.students
            .write()
            .insert(student.id.clone(), student.clone());

        tracing::info!(student_id = %student.id, "Added student");

        Ok(student)
    }

    pub fn get(&self, student_id: &str) -> Result<Student> {
        self.students
            .read()
            .get(student_id)
            .cloned()
            .ok_or_else(|| SchedulingError::StudentNotFound(student_id.to_string()))
    }

    /// All students, ordered by last then first name
    pub fn list(&self) -> Vec<Student> {
        let mut students: Vec<Student> = self.students.read().values().cloned().collect();
        students.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        students
    }

    /// Replace a student's record
    pub fn update(&self, student: Student) -> Result<Student> {
        if !self.students.read().contains_key(&student.id) {
            return Err(SchedulingError::StudentNotFound(student.id));
        }

        self.db.update(
            Table::Students,
            &student.id,
            serde_json::to_value(&student)?,
        )?;
        self.students
            .write()
            .insert(student.id.clone(), student.clone());

        Ok(student)
    }

    pub fn remove(&self, student_id: &str) -> Result<()> {
        if !self.db.delete(Table::Students, student_id)? {
            return Err(SchedulingError::StudentNotFound(student_id.to_string()));
        }
        self.students.write().remove(student_id);

        tracing::info!(student_id = %student_id, "Removed student");

        Ok(())
    }
}

impl Clone for StudentRoster {
    fn clone(&self) -> Self {
        Self {
            students: Arc::clone(&self.students),
            db: self.db.clone(),
        }
    }
}
