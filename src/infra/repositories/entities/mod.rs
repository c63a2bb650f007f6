//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Referential actions declared on the relations mirror the migrations.

pub mod account;
pub mod account_group;
pub mod appointment;
pub mod doctor;
pub mod employee;
pub mod medical_test;
pub mod office;
pub mod patient;
pub mod position;
pub mod role_group;
pub mod schedule;
pub mod service;
pub mod service_doctor;
pub mod service_office;
pub mod specialization;
