//! Sampling of the model over a range of center-of-mass energies

use crate::{
    coupling::ElectroweakParameters,
    numeric::{functions::sqr, Float},
    particle::{Fermion, ELECTRON, MUON, NUM_COLORS, QUARKS},
    rates::Kinematics,
};

use eyre::{ensure, Result};

/// Range of center-of-mass energies √s over which the model is sampled
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergySweep {
    /// First sampled √s (GeV)
    pub start: Float,

    /// Increment between two samples (GeV)
    pub step: Float,

    /// Exclusive upper bound of the sampled √s (GeV)
    pub end: Float,
}
//
impl Default for EnergySweep {
    fn default() -> Self {
        Self {
            start: 0.2,
            step: 0.1,
            end: 160.,
        }
    }
}
//
impl EnergySweep {
    /// Setup a sweep from start (inclusive) to end (exclusive)
    pub fn new(start: Float, step: Float, end: Float) -> Result<Self> {
        Self { start, step, end }.validated()
    }

    /// Check that this sweep samples at least one positive energy
    pub fn validated(self) -> Result<Self> {
        // Rates diverge as 1/s, so the sweep must start above zero
        ensure!(self.start > 0., "Energy sweep must start above 0 GeV");
        ensure!(self.step > 0., "Energy sweep step must be positive");
        ensure!(self.start < self.end, "Energy sweep must not be empty");
        Ok(self)
    }

    /// Iterate over the sampled √s values
    pub fn iter(&self) -> SweepIter {
        SweepIter {
            next: self.start,
            step: self.step,
            end: self.end,
        }
    }

    /// Number of sampled energies
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Truth that no energy is sampled at all
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
//
impl<'a> IntoIterator for &'a EnergySweep {
    type Item = Float;
    type IntoIter = SweepIter;

    fn into_iter(self) -> SweepIter {
        self.iter()
    }
}

/// Iterator over the energies of an `EnergySweep`
///
/// Energies are produced by repeatedly adding the step to the previous value,
/// rounding drift included, so that the sampling grid is the historical one.
///
pub struct SweepIter {
    next: Float,
    step: Float,
    end: Float,
}
//
impl Iterator for SweepIter {
    type Item = Float;

    fn next(&mut self) -> Option<Float> {
        if self.next < self.end {
            let sqrt_s = self.next;
            self.next += self.step;
            Some(sqrt_s)
        } else {
            None
        }
    }
}

/// One sample of a model curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvePoint {
    /// Center-of-mass energy (GeV)
    pub sqrt_s: Float,

    /// Value of the observable
    pub value: Float,
}

/// Observable sampled at increasing center-of-mass energies
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    points: Vec<CurvePoint>,
}
//
impl Curve {
    /// Start an empty curve
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample an observable over a sweep
    pub fn sample(
        params: &ElectroweakParameters,
        sweep: &EnergySweep,
        observable: impl Fn(&Kinematics<'_>) -> Float,
    ) -> Self {
        let points = sweep
            .iter()
            .map(|sqrt_s| CurvePoint {
                sqrt_s,
                value: observable(&Kinematics::new(params, sqr(sqrt_s))),
            })
            .collect();
        Self { points }
    }

    /// Append a sample, which must lie past the previous one
    pub fn push(&mut self, sqrt_s: Float, value: Float) {
        debug_assert!(self.points.last().map_or(true, |last| last.sqrt_s < sqrt_s));
        self.points.push(CurvePoint { sqrt_s, value });
    }

    /// Samples, by increasing energy
    pub fn points(&self) -> &[CurvePoint] {
        &self.points[..]
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Truth that the curve has no sample
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample with the largest value
    pub fn maximum(&self) -> Option<CurvePoint> {
        self.points
            .iter()
            .copied()
            .fold(None, |best, p| match best {
                Some(b) if b.value >= p.value => Some(b),
                _ => Some(p),
            })
    }

    /// Sample with the smallest value
    pub fn minimum(&self) -> Option<CurvePoint> {
        self.points
            .iter()
            .copied()
            .fold(None, |best, p| match best {
                Some(b) if b.value <= p.value => Some(b),
                _ => Some(p),
            })
    }
}

/// R ratio of incoming → outgoing, normalized to the QED muon rate
pub fn ratio_curve(
    params: &ElectroweakParameters,
    sweep: &EnergySweep,
    incoming: &Fermion,
    outgoing: &[Fermion],
    n_colors: Float,
) -> Curve {
    Curve::sample(params, sweep, |kin| {
        kin.decay_rate(incoming, outgoing, n_colors) / kin.qed_rate(1.)
    })
}

/// Photon/Z⁰ interference, normalized to the QED muon rate
pub fn interference_curve(
    params: &ElectroweakParameters,
    sweep: &EnergySweep,
    incoming: &Fermion,
    outgoing: &[Fermion],
    n_colors: Float,
) -> Curve {
    Curve::sample(params, sweep, |kin| {
        kin.gamma_z_interference(incoming, outgoing, n_colors) / kin.qed_rate(1.)
    })
}

/// Forward-backward asymmetry of incoming → outgoing
pub fn afb_curve(
    params: &ElectroweakParameters,
    sweep: &EnergySweep,
    incoming: &Fermion,
    outgoing: &Fermion,
) -> Curve {
    Curve::sample(params, sweep, |kin| {
        kin.forward_backward_asymmetry(incoming, outgoing)
    })
}

/// Every curve of the e⁺e⁻ study, filled in a single sweep
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepResults {
    /// e⁺e⁻ → μ⁺μ⁻ rate with photon and Z⁰ exchange
    pub muon_rate: Curve,

    /// e⁺e⁻ → μ⁺μ⁻ rate with photon exchange only
    pub muon_rate_qed: Curve,

    /// e⁺e⁻ → hadrons rate
    pub hadron_rate: Curve,

    /// Hadronic R ratio
    pub r_ratio: Curve,

    /// Hadronic photon/Z⁰ interference over the QED muon rate
    pub interference: Curve,

    /// Forward-backward asymmetry of e⁺e⁻ → μ⁺μ⁻
    pub afb: Curve,
}
//
impl SweepResults {
    /// Sample all curves over the sweep
    ///
    /// Rates and ratios are only recorded where both the hadronic and the
    /// QED rate are positive, whereas the asymmetry is recorded everywhere.
    ///
    pub fn compute(params: &ElectroweakParameters, sweep: &EnergySweep) -> Self {
        let mut results = Self::default();
        for sqrt_s in sweep {
            let kin = Kinematics::new(params, sqr(sqrt_s));

            let rate_m_full = kin.decay_rate(&ELECTRON, &[MUON], 1.);
            let rate_m_qed = kin.qed_rate(1.);
            let rate_h = kin.decay_rate(&ELECTRON, &QUARKS, NUM_COLORS);
            let rate_i = kin.gamma_z_interference(&ELECTRON, &QUARKS, NUM_COLORS);
            let afb = kin.forward_backward_asymmetry(&ELECTRON, &MUON);

            results.afb.push(sqrt_s, afb);
            if rate_h > 0. && rate_m_qed > 0. {
                results.muon_rate.push(sqrt_s, rate_m_full);
                results.muon_rate_qed.push(sqrt_s, rate_m_qed);
                results.hadron_rate.push(sqrt_s, rate_h);
                results.r_ratio.push(sqrt_s, rate_h / rate_m_qed);
                results.interference.push(sqrt_s, rate_i / rate_m_qed);
            }
        }
        results
    }
}
