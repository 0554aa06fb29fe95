// Generated by crudgen. Do not edit; regenerate instead.

//! Generated `pet` module for the `Pet` entity.
pub mod dto;
pub mod handlers;
pub mod mapper;
pub mod repository;
pub mod stubs;
