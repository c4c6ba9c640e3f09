//! This module defines the fermions which take part in e⁺e⁻ → f f̄

use crate::{coupling::ElectroweakParameters, numeric::Float};
use prefix_num_ops::real::*;
use std::fmt;

/// Number of colors of a quark
pub const NUM_COLORS: Float = 3.;

/// Static properties of a fermion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fermion {
    /// Human-readable name
    name: &'static str,

    /// Electric charge, in units of e
    charge: Float,

    /// Third component of the weak isospin
    weak_isospin: Float,

    /// Mass (GeV)
    mass: Float,
}
//
impl Fermion {
    /// Describe a fermion
    pub const fn new(name: &'static str, charge: Float, weak_isospin: Float, mass: Float) -> Self {
        Self {
            name,
            charge,
            weak_isospin,
            mass,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Electric charge, in units of e
    pub fn charge(&self) -> Float {
        self.charge
    }

    /// Third component of the weak isospin
    pub fn weak_isospin(&self) -> Float {
        self.weak_isospin
    }

    /// Mass (GeV)
    pub fn mass(&self) -> Float {
        self.mass
    }

    /// Vector coupling to the Z⁰, gV = T₃ - 2·Q·sin²θW
    pub fn vector_coupling(&self, params: &ElectroweakParameters) -> Float {
        self.weak_isospin - 2. * self.charge * params.sin2_w
    }

    /// Axial coupling to the Z⁰, gA = T₃
    pub fn axial_coupling(&self) -> Float {
        self.weak_isospin
    }

    /// Truth that a pair of these can be produced at invariant mass squared s
    pub fn is_active(&self, s: Float) -> bool {
        sqrt(s) > 2. * self.mass
    }

    /// Displayable summary of the fermion's couplings
    pub fn properties<'a>(&'a self, params: &'a ElectroweakParameters) -> FermionProperties<'a> {
        FermionProperties {
            fermion: self,
            params,
        }
    }
}

/// Fermion along with the parameters needed to display its couplings
pub struct FermionProperties<'a> {
    fermion: &'a Fermion,
    params: &'a ElectroweakParameters,
}
//
impl fmt::Display for FermionProperties<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fermion = self.fermion;
        write!(
            f,
            "{:<8}: q = {:>7.4}  t3 = {:>4}  gA = {:>4}  gV = {:>7.4}  m = {} GeV",
            fermion.name,
            fermion.charge,
            fermion.weak_isospin,
            fermion.axial_coupling(),
            fermion.vector_coupling(self.params),
            fermion.mass,
        )
    }
}

/// Electron
pub const ELECTRON: Fermion = Fermion::new("electron", -1., -0.5, 5.11e-4);

/// Muon
pub const MUON: Fermion = Fermion::new("muon", -1., -0.5, 0.106);

/// The six quark flavors
pub const QUARKS: [Fermion; 6] = [
    Fermion::new("up", 2. / 3., 0.5, 2.3e-3),
    Fermion::new("down", -1. / 3., -0.5, 4.8e-3),
    Fermion::new("charm", 2. / 3., 0.5, 1.3),
    Fermion::new("strange", -1. / 3., -0.5, 9.5e-2),
    Fermion::new("top", 2. / 3., 0.5, 173.),
    Fermion::new("bottom", -1. / 3., -0.5, 4.7),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::functions::sqr;

    #[test]
    fn threshold_is_strict() {
        let heavy = Fermion::new("heavy", 0., 0.5, 1.5);
        assert!(!heavy.is_active(sqr(3.)));
        assert!(heavy.is_active(sqr(3.000001)));
        assert!(!heavy.is_active(sqr(2.9)));
    }

    #[test]
    fn registry_thresholds() {
        let s = sqr(10.);
        let active = QUARKS.iter().filter(|q| q.is_active(s)).count();
        assert_eq!(active, 5);
        assert!(QUARKS.iter().all(|q| q.is_active(sqr(400.))));
        assert!(!MUON.is_active(sqr(0.2)));
        assert!(ELECTRON.is_active(sqr(0.2)));
    }

    #[test]
    fn couplings() {
        let params = ElectroweakParameters::default();
        assert_eq!(MUON.axial_coupling(), -0.5);
        assert!((MUON.vector_coupling(&params) - (-0.5 + 2. * 0.23)).abs() < 1e-15);
        let up = QUARKS[0];
        assert!((up.vector_coupling(&params) - (0.5 - 4. / 3. * 0.23)).abs() < 1e-15);

        // Changing the Weinberg angle only changes the vector coupling
        let varied = params.with_sin2_weinberg(0.25);
        assert_eq!(MUON.vector_coupling(&varied), 0.);
        assert_eq!(MUON.axial_coupling(), -0.5);
    }

    #[test]
    fn display_names_the_fermion() {
        let params = ElectroweakParameters::default();
        let text = MUON.properties(&params).to_string();
        assert!(text.starts_with("muon"));
        assert!(text.contains("gA = -0.5"));
    }
}
