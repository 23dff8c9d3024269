//! NIST ITS-90 piecewise polynomial tables for thermocouple types J, K, T.
//!
//! Forward tables map °C → mV, inverse tables map mV → °C. A table is an
//! ordered run of segments; evaluation picks the first segment whose upper
//! bound exceeds the input. The leading segment of every table carries no
//! coefficients and marks everything below the alloy's domain; inputs at
//! or past the last bound fall off the end. Both cases answer NaN.
//!
//! Coefficients are stored constant term first, transcribed from the NIST
//! thermocouple reference tables in their published notation.

/// One polynomial segment of a piecewise table.
pub(crate) struct Segment {
    /// Exclusive upper bound of this segment's domain.
    pub upper: f64,
    /// Power-series coefficients, low power first; empty marks
    /// out-of-domain.
    pub coeffs: &'static [f64],
}

/// Evaluate `value` against a piecewise table.
///
/// NaN input fails every bound comparison and falls through to NaN.
pub(crate) fn evaluate(table: &[Segment], value: f64) -> f64 {
    for segment in table {
        if value < segment.upper {
            if segment.coeffs.is_empty() {
                return f64::NAN;
            }
            return segment
                .coeffs
                .iter()
                .rev()
                .fold(0.0, |acc, &c| acc * value + c);
        }
    }
    f64::NAN
}

// ───────────────────────────────────────────────────────────────
// Type K magnetic-ordering correction (forward path, t > 0)
// ───────────────────────────────────────────────────────────────

/// `a0 · exp(a1 · (t − a2)²)`, the ITS-90 exponential term for type K.
pub(crate) const K_CORRECTION_A0: f64 = 0.118_597_600_000;
pub(crate) const K_CORRECTION_A1: f64 = -0.118_343_200_000e-3;
pub(crate) const K_CORRECTION_A2: f64 = 0.126_968_600_000e3;

// ───────────────────────────────────────────────────────────────
// Forward tables: °C → mV
// ───────────────────────────────────────────────────────────────

pub(crate) static FORWARD_J: &[Segment] = &[
    Segment {
        upper: -210.0,
        coeffs: &[],
    },
    Segment {
        upper: 760.0,
        coeffs: &[
            0.000000000000e0,
            0.503811878150e-1,
            0.304758369300e-4,
            -0.856810657200e-7,
            0.132281952950e-9,
            -0.170529583370e-12,
            0.209480906970e-15,
            -0.125383953360e-18,
            0.156317256970e-22,
        ],
    },
    Segment {
        upper: 1200.0,
        coeffs: &[
            0.296456256810e3,
            -0.149761277860e1,
            0.317871039240e-2,
            -0.318476867010e-5,
            0.157208190040e-8,
            -0.306913690560e-12,
        ],
    },
];

pub(crate) static FORWARD_K: &[Segment] = &[
    Segment {
        upper: -270.0,
        coeffs: &[],
    },
    Segment {
        upper: 0.0,
        coeffs: &[
            0.000000000000e0,
            0.394501280250e-1,
            0.236223735980e-4,
            -0.328589067840e-6,
            -0.499048287770e-8,
            -0.675090591730e-10,
            -0.574103274280e-12,
            -0.310888728940e-14,
            -0.104516093650e-16,
            -0.198892668780e-19,
            -0.163226974860e-22,
        ],
    },
    Segment {
        upper: 1372.0,
        coeffs: &[
            -0.176004136860e-1,
            0.389212049750e-1,
            0.185587700320e-4,
            -0.994575928740e-7,
            0.318409457190e-9,
            -0.560728448890e-12,
            0.560750590590e-15,
            -0.320207200030e-18,
            0.971511471520e-22,
            -0.121047212750e-25,
        ],
    },
];

pub(crate) static FORWARD_T: &[Segment] = &[
    Segment {
        upper: -270.0,
        coeffs: &[],
    },
    Segment {
        upper: 0.0,
        coeffs: &[
            0.000000000000e0,
            0.387481063640e-1,
            0.441944343470e-4,
            0.118443231050e-6,
            0.200329735540e-7,
            0.901380195590e-9,
            0.226511565930e-10,
            0.360711542050e-12,
            0.384939398830e-14,
            0.282135219250e-16,
            0.142515947790e-18,
            0.487686622860e-21,
            0.107955392700e-23,
            0.139450270620e-26,
            0.797951539270e-30,
        ],
    },
    Segment {
        upper: 400.0,
        coeffs: &[
            0.000000000000e0,
            0.387481063640e-1,
            0.332922278800e-4,
            0.206182434040e-6,
            -0.218822568460e-8,
            0.109968809280e-10,
            -0.308157587720e-13,
            0.454791352900e-16,
            -0.275129016730e-19,
        ],
    },
];

// ───────────────────────────────────────────────────────────────
// Inverse tables: mV → °C
// ───────────────────────────────────────────────────────────────

pub(crate) static INVERSE_J: &[Segment] = &[
    Segment {
        upper: -8.095,
        coeffs: &[],
    },
    Segment {
        upper: 0.0,
        coeffs: &[
            0.0000000e0,
            1.9528268e1,
            -1.2286185e0,
            -1.0752178e0,
            -5.9086933e-1,
            -1.7256713e-1,
            -2.8131513e-2,
            -2.3963370e-3,
            -8.3823321e-5,
        ],
    },
    Segment {
        upper: 42.919,
        coeffs: &[
            0.000000e0,
            1.978425e1,
            -2.001204e-1,
            1.036969e-2,
            -2.549687e-4,
            3.585153e-6,
            -5.344285e-8,
            5.099890e-10,
        ],
    },
    Segment {
        upper: 69.553,
        coeffs: &[
            -3.11358187e3,
            3.00543684e2,
            -9.94773230e0,
            1.70276630e-1,
            -1.43033468e-3,
            4.73886084e-6,
        ],
    },
];

pub(crate) static INVERSE_K: &[Segment] = &[
    Segment {
        upper: -5.891,
        coeffs: &[],
    },
    Segment {
        upper: 0.0,
        coeffs: &[
            0.0000000e0,
            2.5173462e1,
            -1.1662878e0,
            -1.0833638e0,
            -8.9773540e-1,
            -3.7342377e-1,
            -8.6632643e-2,
            -1.0450598e-2,
            -5.1920577e-4,
        ],
    },
    Segment {
        upper: 20.644,
        coeffs: &[
            0.000000e0,
            2.508355e1,
            7.860106e-2,
            -2.503131e-1,
            8.315270e-2,
            -1.228034e-2,
            9.804036e-4,
            -4.413030e-5,
            1.057734e-6,
            -1.052755e-8,
        ],
    },
    Segment {
        upper: 54.886,
        coeffs: &[
            -1.318058e2,
            4.830222e1,
            -1.646031e0,
            5.464731e-2,
            -9.650715e-4,
            8.802193e-6,
            -3.110810e-8,
        ],
    },
];

pub(crate) static INVERSE_T: &[Segment] = &[
    Segment {
        upper: -5.603,
        coeffs: &[],
    },
    Segment {
        upper: 0.0,
        coeffs: &[
            0.0000000e0,
            2.5949192e1,
            -2.1316967e-1,
            7.9018692e-1,
            4.2527777e-1,
            1.3304473e-1,
            2.0241446e-2,
            1.2668171e-3,
        ],
    },
    Segment {
        upper: 20.872,
        coeffs: &[
            0.000000e0,
            2.592800e1,
            -7.602961e-1,
            4.637791e-2,
            -2.165394e-3,
            6.048144e-5,
            -7.293422e-7,
        ],
    },
];
