/*!
    Procedural test content.

    Everything here is a pure function of frame and sample indices, so two
    runs with the same configuration feed the encoders identical input.
*/

use std::f64::consts::PI;

use ffmpeg_types::{AudioFrame, Error, Result, SampleFormat, VideoFrame};

/**
    A sine tone.
*/
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Peak amplitude, 1.0 being full scale.
    pub amplitude: f64,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            amplitude: 0.1,
        }
    }
}

impl Tone {
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }

    /**
        Value of sample `n` (counted from the start of the stream).
    */
    pub fn sample(&self, n: i64, sample_rate: u32) -> f32 {
        let t = n as f64 / sample_rate as f64;
        ((2.0 * PI * self.frequency * t).sin() * self.amplitude) as f32
    }
}

/**
    Draw the moving diagonal gradient for `frame_index`.

    Luma at (x, y) is `(x + y + frame_index) mod 256`; every chroma plane is a
    flat 128, so the picture is grey-scale.
*/
pub fn fill_test_pattern(frame: &mut VideoFrame, frame_index: i64) {
    let (width, height) = frame.plane_size(0);
    let luma = frame.plane_mut(0);
    for y in 0..height {
        let row = &mut luma[y * width..(y + 1) * width];
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = ((x + y) as i64 + frame_index).rem_euclid(256) as u8;
        }
    }

    for plane in 1..frame.format.plane_count() {
        frame.plane_mut(plane).fill(128);
    }
}

/**
    Fill every channel of a planar float `frame` with `tone`, starting at
    stream sample `first_sample`.
*/
pub fn fill_tone(frame: &mut AudioFrame, first_sample: i64, tone: Tone) -> Result<()> {
    if frame.format != SampleFormat::F32p {
        return Err(Error::unsupported_format(format!(
            "tone needs planar float samples, frame is {:?}",
            frame.format
        )));
    }

    let sample_rate = frame.sample_rate;
    let values = (0..frame.samples as i64).map(move |i| tone.sample(first_sample + i, sample_rate));
    for plane in 0..frame.plane_count() {
        frame.write_f32_plane(plane, values.clone());
    }
    Ok(())
}
