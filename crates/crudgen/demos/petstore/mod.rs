// Generated by crudgen. Do not edit; regenerate instead.

//! Generated modules for `petstore`.
pub mod pet;
