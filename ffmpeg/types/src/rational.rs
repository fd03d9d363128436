/*!
    Rational numbers for frame rates and time bases.
*/

/**
    A rational number, used for time bases (1/30, 1/48000) and frame rates (30/1).
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /**
        Returns the reciprocal (a frame rate becomes a time base and back).
    */
    pub const fn invert(self) -> Self {
        Self {
            num: self.den,
            den: self.num,
        }
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /**
        Rescale a timestamp expressed in `from` units into `to` units.

        Rounds to the nearest integer with halfway cases away from zero, which
        is what FFmpeg's packet rescaling does.
    */
    pub fn rescale(ts: i64, from: Rational, to: Rational) -> i64 {
        if from == to {
            return ts;
        }

        let mut num = ts as i128 * from.num as i128 * to.den as i128;
        let mut den = from.den as i128 * to.num as i128;
        if den == 0 {
            return ts;
        }
        if den < 0 {
            num = -num;
            den = -den;
        }

        let half = den / 2;
        let scaled = if num >= 0 {
            (num + half) / den
        } else {
            -((-num + half) / den)
        };
        scaled as i64
    }
}

impl std::fmt::Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_time_bases_pass_through() {
        let tb = Rational::new(1, 30);
        assert_eq!(Rational::rescale(17, tb, tb), 17);
    }

    #[test]
    fn frame_index_to_mp4_timescale() {
        // mov picks a 1/15360 timescale for 30 fps video
        let from = Rational::new(1, 30);
        let to = Rational::new(1, 15360);
        assert_eq!(Rational::rescale(0, from, to), 0);
        assert_eq!(Rational::rescale(1, from, to), 512);
        assert_eq!(Rational::rescale(59, from, to), 30208);
    }

    #[test]
    fn rounds_to_nearest() {
        let from = Rational::new(1, 48000);
        let to = Rational::new(1, 1000);
        // 1024 / 48 = 21.33 ms
        assert_eq!(Rational::rescale(1024, from, to), 21);
        // 24 / 48 = 0.5 ms rounds away from zero
        assert_eq!(Rational::rescale(24, from, to), 1);
        assert_eq!(Rational::rescale(-24, from, to), -1);
    }

    #[test]
    fn rescaling_keeps_strict_ordering_for_audio_frames() {
        let from = Rational::new(1, 48000);
        let to = Rational::new(1, 44100);
        let rescaled: Vec<i64> = (0..93)
            .map(|i| Rational::rescale(i * 1024, from, to))
            .collect();
        assert!(rescaled.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn invert_swaps_terms() {
        assert_eq!(Rational::new(30, 1).invert(), Rational::new(1, 30));
        assert_eq!(Rational::new(1, 30).to_string(), "1/30");
    }
}
