// src/models/mod.rs

pub mod account;
pub mod answer_sheet;
pub mod grade;
pub mod lesson;
pub mod subject;
