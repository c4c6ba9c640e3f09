//! R ratio: electroweak e⁺e⁻ annihilation versus center-of-mass energy
//!
//!
//! # Introduction (for the physicist)
//!
//! This small computational program evaluates the lowest order rates of
//! electron + positron gives fermion + antifermion (e⁺e⁻ → f f̄), through
//! photon and Z⁰ exchange, as a function of the center-of-mass energy √s.
//!
//! From these rates it derives the classic observables of the LEP era: the
//! hadronic R ratio (hadron production normalized to the QED muon rate),
//! the photon/Z⁰ interference contribution to it, and the forward-backward
//! asymmetry of muon pairs. The R ratio is then compared with a table of
//! measurements, whose errors combine statistical and systematic sources.
//!
//!
//! # Introduction (for the numerical guy)
//!
//! There is nothing to integrate: every quantity is an analytic formula which
//! is evaluated on a regular grid of √s values. The only subtlety is that the
//! Z⁰ propagator is nearly singular at the peak, which the finite Z⁰ width
//! regularizes.
//!
//!
//! # Introduction (for the computer guy)
//!
//! The program works in a single pass:
//!
//! * read in parameters
//! * sweep over center-of-mass energies, evaluating all observables at each
//!   point from the same running coupling and Z⁰ propagator
//! * repeat the R ratio computation with a different Weinberg angle
//! * read in the experimental dataset
//! * then display / store the result.
//!
//! The electroweak constants are a value which is passed around by reference,
//! so that runs with different constants cannot affect one another.

#![warn(missing_docs)]

pub mod config;
pub mod coupling;
pub mod dataset;
pub mod numeric;
pub mod output;
pub mod particle;
pub mod rates;
pub mod sweep;
