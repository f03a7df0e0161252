//! Interface layer: everything that exposes the backend to the outside.

pub mod rest;
