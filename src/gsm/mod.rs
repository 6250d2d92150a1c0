#![warn(missing_docs)]
//! Partially coherent undulator sources described by a Gaussian Schell-model (GSM).
//!
//! The [`GsmSourceSynthesizer`] convolves the natural undulator radiation with the electron beam, derives the
//! coherent fraction per axis, truncates the coherent-mode ladder at a spectral density threshold and sets one
//! selected Hermite-Gaussian mode on a [`Wavefront2D`](crate::wavefront::Wavefront2D).
pub mod gaussian_schell;
pub mod hermite;
mod synthesizer;
pub mod undulator;

pub use gaussian_schell::{GaussianSchellModel1D, GaussianSchellModel2D};
pub use synthesizer::{GsmSourceSynthesizer, ModeSelection, SynthesisResult, SynthesizerConfig};
pub use undulator::{AxisCoherence, ElectronBeamSigmas, RadiationSigmas};
