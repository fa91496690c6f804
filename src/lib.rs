//! formsmith
//!
//! Renders a set of predefined form templates to PDF. Templates are
//! registered once per run in a [`templates::Registry`] and driven by the
//! [`application::Dispatcher`], which isolates per-template failures and
//! produces a [`application::BatchReport`].
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod pdf;
pub mod templates;

pub use crate::{
    application::{BatchReport, Dispatcher, RunMode},
    core::{Config, Error, Result},
    templates::{Registry, RenderContext, Template, TemplateOptions},
};
