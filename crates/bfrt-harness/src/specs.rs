//! Typed views over the runtime-provided resource spec fields.
//!
//! Meter, LPF and WRED specs are approximate on real hardware: read-back is
//! within ±2% of the requested rate/burst values, except the WRED
//! max-drop-probability which is within ±10 percentage points. The
//! comparison helpers here encode those tolerances.

use bfrt_client::{Data, DataTuple, Result};

/// Relative tolerance applied to rate and burst spec fields.
pub const SPEC_TOLERANCE_PERCENT: f64 = 2.0;
/// Absolute tolerance applied to drop probabilities, in percentage points.
pub const DROP_PROBABILITY_TOLERANCE_POINTS: f64 = 0.10;

/// True when `actual` is within `percent`% of `expected`.
pub fn within_percent(expected: f64, actual: f64, percent: f64) -> bool {
    if expected == 0.0 {
        return actual == 0.0;
    }
    ((actual - expected) / expected).abs() * 100.0 <= percent
}

/// True when `actual` is within `points` of `expected` (both in `[0, 1]`).
pub fn within_points(expected: f64, actual: f64, points: f64) -> bool {
    (actual - expected).abs() <= points
}

/// Direct/indirect counter spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSpec {
    pub bytes: u64,
    pub pkts: u64,
}

impl CounterSpec {
    pub fn tuples(&self) -> Vec<DataTuple> {
        vec![
            DataTuple::new("$COUNTER_SPEC_BYTES", self.bytes),
            DataTuple::new("$COUNTER_SPEC_PKTS", self.pkts),
        ]
    }

    pub fn from_data(data: &Data) -> Result<Self> {
        Ok(Self {
            bytes: data.get_int("$COUNTER_SPEC_BYTES")?,
            pkts: data.get_int("$COUNTER_SPEC_PKTS")?,
        })
    }
}

/// Two-rate three-color meter spec, rates in kbps and bursts in kbits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeterSpec {
    pub cir_kbps: u64,
    pub pir_kbps: u64,
    pub cbs_kbits: u64,
    pub pbs_kbits: u64,
}

impl MeterSpec {
    pub fn tuples(&self) -> Vec<DataTuple> {
        vec![
            DataTuple::new("$METER_SPEC_CIR_KBPS", self.cir_kbps),
            DataTuple::new("$METER_SPEC_PIR_KBPS", self.pir_kbps),
            DataTuple::new("$METER_SPEC_CBS_KBITS", self.cbs_kbits),
            DataTuple::new("$METER_SPEC_PBS_KBITS", self.pbs_kbits),
        ]
    }

    pub fn from_data(data: &Data) -> Result<Self> {
        Ok(Self {
            cir_kbps: data.get_int("$METER_SPEC_CIR_KBPS")?,
            pir_kbps: data.get_int("$METER_SPEC_PIR_KBPS")?,
            cbs_kbits: data.get_int("$METER_SPEC_CBS_KBITS")?,
            pbs_kbits: data.get_int("$METER_SPEC_PBS_KBITS")?,
        })
    }

    /// Hardware-tolerance comparison: every field within ±2%.
    pub fn approx_eq(&self, other: &Self) -> bool {
        within_percent(self.cir_kbps as f64, other.cir_kbps as f64, SPEC_TOLERANCE_PERCENT)
            && within_percent(self.pir_kbps as f64, other.pir_kbps as f64, SPEC_TOLERANCE_PERCENT)
            && within_percent(self.cbs_kbits as f64, other.cbs_kbits as f64, SPEC_TOLERANCE_PERCENT)
            && within_percent(self.pbs_kbits as f64, other.pbs_kbits as f64, SPEC_TOLERANCE_PERCENT)
    }
}

/// Low-pass filter spec.
#[derive(Debug, Clone, PartialEq)]
pub struct LpfSpec {
    /// `"RATE"` or `"SAMPLE"`.
    pub lpf_type: String,
    pub gain_time_ns: f64,
    pub decay_time_ns: f64,
    pub out_scale_down_factor: u32,
}

impl LpfSpec {
    pub fn tuples(&self) -> Vec<DataTuple> {
        vec![
            DataTuple::new("$LPF_SPEC_TYPE", self.lpf_type.as_str()),
            DataTuple::new("$LPF_SPEC_GAIN_TIME_CONSTANT_NS", self.gain_time_ns),
            DataTuple::new("$LPF_SPEC_DECAY_TIME_CONSTANT_NS", self.decay_time_ns),
            DataTuple::new("$LPF_SPEC_OUT_SCALE_DOWN_FACTOR", self.out_scale_down_factor),
        ]
    }

    pub fn from_data(data: &Data) -> Result<Self> {
        Ok(Self {
            lpf_type: data.get_str("$LPF_SPEC_TYPE")?.to_string(),
            gain_time_ns: data.get_float("$LPF_SPEC_GAIN_TIME_CONSTANT_NS")?,
            decay_time_ns: data.get_float("$LPF_SPEC_DECAY_TIME_CONSTANT_NS")?,
            out_scale_down_factor: data.get_int("$LPF_SPEC_OUT_SCALE_DOWN_FACTOR")? as u32,
        })
    }

    pub fn approx_eq(&self, other: &Self) -> bool {
        self.lpf_type == other.lpf_type
            && self.out_scale_down_factor == other.out_scale_down_factor
            && within_percent(self.gain_time_ns, other.gain_time_ns, SPEC_TOLERANCE_PERCENT)
            && within_percent(self.decay_time_ns, other.decay_time_ns, SPEC_TOLERANCE_PERCENT)
    }
}

/// WRED spec; drop probability in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WredSpec {
    pub time_constant_ns: f64,
    pub min_thresh_cells: u32,
    pub max_thresh_cells: u32,
    pub max_drop_probability: f64,
}

impl WredSpec {
    pub fn tuples(&self) -> Vec<DataTuple> {
        vec![
            DataTuple::new("$WRED_SPEC_TIME_CONSTANT_NS", self.time_constant_ns),
            DataTuple::new("$WRED_SPEC_MIN_THRESH_CELLS", self.min_thresh_cells),
            DataTuple::new("$WRED_SPEC_MAX_THRESH_CELLS", self.max_thresh_cells),
            DataTuple::new("$WRED_SPEC_MAX_PROBABILITY", self.max_drop_probability),
        ]
    }

    pub fn from_data(data: &Data) -> Result<Self> {
        Ok(Self {
            time_constant_ns: data.get_float("$WRED_SPEC_TIME_CONSTANT_NS")?,
            min_thresh_cells: data.get_int("$WRED_SPEC_MIN_THRESH_CELLS")? as u32,
            max_thresh_cells: data.get_int("$WRED_SPEC_MAX_THRESH_CELLS")? as u32,
            max_drop_probability: data.get_float("$WRED_SPEC_MAX_PROBABILITY")?,
        })
    }

    pub fn approx_eq(&self, other: &Self) -> bool {
        self.min_thresh_cells == other.min_thresh_cells
            && self.max_thresh_cells == other.max_thresh_cells
            && within_percent(
                self.time_constant_ns,
                other.time_constant_ns,
                SPEC_TOLERANCE_PERCENT,
            )
            && within_points(
                self.max_drop_probability,
                other.max_drop_probability,
                DROP_PROBABILITY_TOLERANCE_POINTS,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_percent() {
        assert!(within_percent(1000.0, 1019.0, 2.0));
        assert!(!within_percent(1000.0, 1021.0, 2.0));
        assert!(within_percent(0.0, 0.0, 2.0));
        assert!(!within_percent(0.0, 1.0, 2.0));
    }

    #[test]
    fn test_meter_tolerance() {
        let requested = MeterSpec {
            cir_kbps: 1000,
            pir_kbps: 2000,
            cbs_kbits: 100,
            pbs_kbits: 200,
        };
        let read_back = MeterSpec {
            cir_kbps: 1015,
            pir_kbps: 1985,
            cbs_kbits: 101,
            pbs_kbits: 199,
        };
        assert!(requested.approx_eq(&read_back));

        let off = MeterSpec {
            cir_kbps: 1100,
            ..read_back
        };
        assert!(!requested.approx_eq(&off));
    }

    #[test]
    fn test_wred_probability_points() {
        let requested = WredSpec {
            time_constant_ns: 100.0,
            min_thresh_cells: 10,
            max_thresh_cells: 100,
            max_drop_probability: 0.50,
        };
        let mut read_back = requested.clone();
        read_back.max_drop_probability = 0.59;
        assert!(requested.approx_eq(&read_back));
        read_back.max_drop_probability = 0.65;
        assert!(!requested.approx_eq(&read_back));
    }
}
