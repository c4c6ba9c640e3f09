//! Differential rates of e⁺e⁻ → f f̄ through photon and Z⁰ exchange

use crate::{
    coupling::ElectroweakParameters,
    numeric::{floats::consts::PI, functions::sqr, Float},
    particle::Fermion,
};

/// Quantities shared by every rate evaluated at one invariant mass squared
///
/// Evaluating several observables at the same s through one `Kinematics`
/// computes the running coupling and the Z⁰ propagator only once.
///
pub struct Kinematics<'params> {
    /// Electroweak parameters used for the evaluation
    params: &'params ElectroweakParameters,

    /// Invariant mass squared (GeV²)
    s: Float,

    /// Running fine structure constant at s
    alpha: Float,

    /// Re(χ)
    chi_real: Float,

    /// χ²
    chi_square: Float,
}
//
impl<'params> Kinematics<'params> {
    /// Prepare rate evaluations at invariant mass squared s
    pub fn new(params: &'params ElectroweakParameters, s: Float) -> Self {
        debug_assert!(s > 0., "Rates are undefined at s <= 0");
        Self {
            params,
            s,
            alpha: params.alpha(s),
            chi_real: params.chi_real(s),
            chi_square: params.chi_square(s),
        }
    }

    /// Invariant mass squared
    pub fn s(&self) -> Float {
        self.s
    }

    /// Running fine structure constant at s
    pub fn alpha(&self) -> Float {
        self.alpha
    }

    /// Common normalization π·α²/(2s) of the photon/Z⁰ rates
    fn rate_factor(&self) -> Float {
        PI * sqr(self.alpha) / (2. * self.s)
    }

    /// Pure photon exchange contribution for one fermion pair
    fn photon_term(&self, incoming: &Fermion, outgoing: &Fermion) -> Float {
        sqr(incoming.charge() * outgoing.charge())
    }

    /// Photon/Z⁰ interference contribution for one fermion pair
    fn interference_term(&self, incoming: &Fermion, outgoing: &Fermion) -> Float {
        let params = self.params;
        8. * incoming.charge()
            * outgoing.charge()
            * incoming.vector_coupling(params)
            * outgoing.vector_coupling(params)
            * self.chi_real
    }

    /// Pure Z⁰ exchange contribution for one fermion pair
    fn z_term(&self, incoming: &Fermion, outgoing: &Fermion) -> Float {
        let params = self.params;
        let strength =
            |f: &Fermion| sqr(f.axial_coupling()) + sqr(f.vector_coupling(params));
        16. * strength(incoming) * strength(outgoing) * self.chi_square
    }

    /// Sum a per-pair term over the outgoing fermions which can be produced
    /// and apply the common normalization, or 0 if the incoming fermion
    /// is below threshold
    fn summed_rate(
        &self,
        incoming: &Fermion,
        outgoing: &[Fermion],
        n_colors: Float,
        term: impl Fn(&Fermion) -> Float,
    ) -> Float {
        if !incoming.is_active(self.s) {
            return 0.;
        }
        let sum: Float = outgoing
            .iter()
            .filter(|f| f.is_active(self.s))
            .map(term)
            .sum();
        8. / 3. * n_colors * sum * self.rate_factor()
    }

    /// Differential decay rate dΓ/ds with photon and Z⁰ exchange
    pub fn decay_rate(&self, incoming: &Fermion, outgoing: &[Fermion], n_colors: Float) -> Float {
        self.summed_rate(incoming, outgoing, n_colors, |o| {
            self.photon_term(incoming, o)
                + self.interference_term(incoming, o)
                + self.z_term(incoming, o)
        })
    }

    /// Pure QED differential decay rate, the reference rate of the R ratio
    pub fn qed_rate(&self, n_colors: Float) -> Float {
        4. * n_colors * PI * sqr(self.alpha) / (3. * self.s)
    }

    /// Photon/Z⁰ interference part of the differential decay rate
    pub fn gamma_z_interference(
        &self,
        incoming: &Fermion,
        outgoing: &[Fermion],
        n_colors: Float,
    ) -> Float {
        self.summed_rate(incoming, outgoing, n_colors, |o| {
            self.interference_term(incoming, o)
        })
    }

    /// Forward-backward asymmetry of the outgoing fermion
    pub fn forward_backward_asymmetry(&self, incoming: &Fermion, outgoing: &Fermion) -> Float {
        if !(incoming.is_active(self.s) && outgoing.is_active(self.s)) {
            return 0.;
        }
        let params = self.params;
        let axial = incoming.axial_coupling() * outgoing.axial_coupling();
        let vector = incoming.vector_coupling(params) * outgoing.vector_coupling(params);
        let numerator = (16. * incoming.charge() * outgoing.charge() * axial * self.chi_real
            + 128. * vector * axial * self.chi_square)
            * self.rate_factor();
        numerator / self.decay_rate(incoming, std::slice::from_ref(outgoing), 1.)
    }
}

/// Differential decay rate dΓ/ds at invariant mass squared s
pub fn differential_decay_rate(
    params: &ElectroweakParameters,
    s: Float,
    incoming: &Fermion,
    outgoing: &[Fermion],
    n_colors: Float,
) -> Float {
    Kinematics::new(params, s).decay_rate(incoming, outgoing, n_colors)
}

/// Pure QED differential decay rate at invariant mass squared s
pub fn differential_decay_rate_qed(params: &ElectroweakParameters, s: Float, n_colors: Float) -> Float {
    Kinematics::new(params, s).qed_rate(n_colors)
}

/// Photon/Z⁰ interference rate at invariant mass squared s
pub fn gamma_z_interference(
    params: &ElectroweakParameters,
    s: Float,
    incoming: &Fermion,
    outgoing: &[Fermion],
    n_colors: Float,
) -> Float {
    Kinematics::new(params, s).gamma_z_interference(incoming, outgoing, n_colors)
}

/// Forward-backward asymmetry at invariant mass squared s
pub fn forward_backward_asymmetry(
    params: &ElectroweakParameters,
    s: Float,
    incoming: &Fermion,
    outgoing: &Fermion,
) -> Float {
    Kinematics::new(params, s).forward_backward_asymmetry(incoming, outgoing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{ELECTRON, MUON, NUM_COLORS, QUARKS};
    use float_cmp::assert_approx_eq;

    fn r_ratio(params: &ElectroweakParameters, sqrt_s: Float) -> Float {
        let kin = Kinematics::new(params, sqr(sqrt_s));
        kin.decay_rate(&ELECTRON, &QUARKS, NUM_COLORS) / kin.qed_rate(1.)
    }

    #[test]
    fn qed_rate_is_positive() {
        let params = ElectroweakParameters::default();
        for &sqrt_s in &[0.2, 1., 10., 91.2, 159.9] {
            assert!(differential_decay_rate_qed(&params, sqr(sqrt_s), 1.) > 0.);
        }
    }

    #[test]
    fn r_ratio_counts_quark_charges_below_the_z() {
        // u, d, s, c and b are open at 20 GeV: 3·(4/9 + 1/9 + 1/9 + 4/9 + 1/9)
        let params = ElectroweakParameters::default();
        let r = r_ratio(&params, 20.);
        assert!((r - 11. / 3.).abs() < 0.1, "R = {}", r);
        assert!(r.is_finite());
    }

    #[test]
    fn muon_ratio_peaks_at_the_z() {
        let params = ElectroweakParameters::default();
        let ratio = |sqrt_s: Float| {
            let kin = Kinematics::new(&params, sqr(sqrt_s));
            kin.decay_rate(&ELECTRON, &[MUON], 1.) / kin.qed_rate(1.)
        };
        assert!((ratio(5.) - 1.).abs() < 0.01);
        assert!(ratio(91.2) > 100.);
        assert!(ratio(91.2) > ratio(85.));
        assert!(ratio(91.2) > ratio(97.));
    }

    #[test]
    fn rates_vanish_below_the_incoming_threshold() {
        let params = ElectroweakParameters::default();
        let s = sqr(0.2);
        assert_eq!(differential_decay_rate(&params, s, &MUON, &[ELECTRON], 1.), 0.);
        assert_eq!(gamma_z_interference(&params, s, &MUON, &QUARKS, NUM_COLORS), 0.);
    }

    #[test]
    fn closed_channels_do_not_contribute() {
        let params = ElectroweakParameters::default();
        let s = sqr(0.2);
        assert_eq!(differential_decay_rate(&params, s, &ELECTRON, &[MUON], 1.), 0.);
        assert!(differential_decay_rate(&params, s, &ELECTRON, &QUARKS, NUM_COLORS) > 0.);
    }

    #[test]
    fn decay_rate_splits_into_its_terms() {
        let params = ElectroweakParameters::default();
        let kin = Kinematics::new(&params, sqr(60.));
        let total = kin.decay_rate(&ELECTRON, &QUARKS, NUM_COLORS);
        let interference = kin.gamma_z_interference(&ELECTRON, &QUARKS, NUM_COLORS);
        let others = kin.summed_rate(&ELECTRON, &QUARKS, NUM_COLORS, |o| {
            kin.photon_term(&ELECTRON, o) + kin.z_term(&ELECTRON, o)
        });
        assert_approx_eq!(Float, total, interference + others, epsilon = 1e-12 * total);
    }

    #[test]
    fn asymmetry_vanishes_below_threshold() {
        let params = ElectroweakParameters::default();
        assert_eq!(forward_backward_asymmetry(&params, sqr(0.2), &ELECTRON, &MUON), 0.);
        assert_eq!(forward_backward_asymmetry(&params, sqr(0.2), &MUON, &ELECTRON), 0.);
        let top = QUARKS[4];
        assert_eq!(forward_backward_asymmetry(&params, sqr(100.), &ELECTRON, &top), 0.);
    }

    #[test]
    fn asymmetry_changes_sign_across_the_z() {
        let params = ElectroweakParameters::default();
        let afb = |sqrt_s: Float| forward_backward_asymmetry(&params, sqr(sqrt_s), &ELECTRON, &MUON);
        assert!(afb(35.) < 0.);
        assert!(afb(120.) > 0.);
        assert!(afb(35.).abs() < 1.);
        assert!(afb(120.).abs() < 1.);
    }

    #[test]
    fn weinberg_angle_matters() {
        let base = ElectroweakParameters::default();
        let varied = base.with_sin2_weinberg(0.25);
        let (r_base, r_varied) = (r_ratio(&base, 60.), r_ratio(&varied, 60.));
        assert_ne!(r_base, r_varied);
        assert_eq!(r_ratio(&base, 60.), r_base);
    }
}
