// src/model/constraint.rs

use chrono::NaiveDate;

use crate::model::schedule::Schedule;
use crate::types::ConstraintType;

/// An immovable date bound attached to a task. Bounds are exclusive for the
/// before/after kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub date: NaiveDate,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, date: NaiveDate) -> Self {
        Self {
            constraint_type,
            date,
        }
    }

    /// Whether `schedule` satisfies this constraint.
    pub fn is_satisfied_by(&self, schedule: &Schedule) -> bool {
        let proposed = schedule.date_at(self.constraint_type.anchor());
        match self.constraint_type {
            ConstraintType::MustStartOn | ConstraintType::MustEndOn => proposed == self.date,
            ConstraintType::MustStartBefore | ConstraintType::MustEndBefore => {
                proposed < self.date
            }
            ConstraintType::MustStartAfter | ConstraintType::MustEndAfter => proposed > self.date,
        }
    }

    /// The date of `schedule` this constraint is checked against.
    pub fn proposed_date(&self, schedule: &Schedule) -> NaiveDate {
        schedule.date_at(self.constraint_type.anchor())
    }
}
