//! UI module - reusable widgets shared by the gallery, sidebar and popup

pub mod components;
