//! sea-orm entities for the `todos` and `notes` tables.

pub mod note;
pub mod sea_orm_active_enums;
pub mod todo;
