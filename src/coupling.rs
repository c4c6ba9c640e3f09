//! Electroweak parameters and the couplings derived from them
//!
//! Every model formula receives an `ElectroweakParameters` by reference
//! instead of reading process-wide state, so two evaluations with different
//! values of the Weinberg angle can never observe one another.

use crate::numeric::{
    floats::consts::PI,
    functions::{norm_sqr, sqr},
    Complex, Float,
};
use prefix_num_ops::real::*;

/// How the fine structure constant runs away from the Z⁰ peak
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlphaRunning {
    /// Historical evaluation, where the logarithm is taken of (s/mZ)·mZ = s
    ///
    /// This is what the published curves were computed with, so it remains
    /// the default in order to keep their numbers reproducible.
    Literal,

    /// One-loop running with the intended ln(s/mZ²) argument
    Physical,
}

/// Set of electroweak constants used by every model evaluation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElectroweakParameters {
    /// Fine structure constant at the Z⁰ peak
    pub alpha_z: Float,

    /// Square sine of Weinberg's Theta
    pub sin2_w: Float,

    /// Z⁰ boson mass (GeV)
    pub m_z0: Float,

    /// Z⁰ boson width (GeV)
    pub g_z0: Float,

    /// Flavor of fine structure constant running
    pub alpha_running: AlphaRunning,
}
//
impl Default for ElectroweakParameters {
    fn default() -> Self {
        Self {
            alpha_z: 1. / 128.,
            sin2_w: 0.23,
            m_z0: 91.2,
            g_z0: 2.5,
            alpha_running: AlphaRunning::Literal,
        }
    }
}
//
impl ElectroweakParameters {
    /// Copy of these parameters with a different Weinberg angle
    pub fn with_sin2_weinberg(self, sin2_w: Float) -> Self {
        Self { sin2_w, ..self }
    }

    /// Copy of these parameters with a different alpha running flavor
    pub fn with_alpha_running(self, alpha_running: AlphaRunning) -> Self {
        Self {
            alpha_running,
            ..self
        }
    }

    /// Fine structure constant at invariant mass squared s
    pub fn alpha(&self, s: Float) -> Float {
        running_alpha(s, self.alpha_z, self.m_z0, self.alpha_running)
    }

    /// Normalization of the Z⁰ exchange relative to the photon exchange,
    /// 16·sin²θW·cos²θW
    pub fn z_normalization(&self) -> Float {
        16. * self.sin2_w * (1. - self.sin2_w)
    }

    /// Z⁰ propagator factor s / (s - mZ² + i·mZ·ΓZ)
    pub fn propagator(&self, s: Float) -> Complex {
        let m2_z0 = sqr(self.m_z0);
        Complex::new(s, 0.) / Complex::new(s - m2_z0, self.m_z0 * self.g_z0)
    }

    /// Re(χ), the real part of the normalized Z⁰ propagator
    pub fn chi_real(&self, s: Float) -> Float {
        self.propagator(s).re / self.z_normalization()
    }

    /// χ², the squared modulus of the normalized Z⁰ propagator
    pub fn chi_square(&self, s: Float) -> Float {
        norm_sqr(self.propagator(s)) / sqr(self.z_normalization())
    }
}

/// Running of the fine structure constant, starting from its value at the Z⁰
/// peak
pub fn running_alpha(s: Float, alpha_z: Float, m_z0: Float, running: AlphaRunning) -> Float {
    let log_arg = match running {
        AlphaRunning::Literal => s / m_z0 * m_z0,
        AlphaRunning::Physical => s / sqr(m_z0),
    };
    alpha_z / (1. - (alpha_z / (3. * PI)) * ln(log_arg))
}

/// Re(χ) for explicit Z⁰ parameters
pub fn chi_real(s: Float, m_z0: Float, g_z0: Float, sin2_w: Float) -> Float {
    ElectroweakParameters {
        m_z0,
        g_z0,
        sin2_w,
        ..Default::default()
    }
    .chi_real(s)
}

/// χ² for explicit Z⁰ parameters
pub fn chi_square(s: Float, m_z0: Float, g_z0: Float, sin2_w: Float) -> Float {
    ElectroweakParameters {
        m_z0,
        g_z0,
        sin2_w,
        ..Default::default()
    }
    .chi_square(s)
}
