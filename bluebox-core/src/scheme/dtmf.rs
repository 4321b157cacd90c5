use super::{FrequencyPair, FrequencyScheme};

static FREQUENCIES_LOW:  [f64; 4] = [ 697.0,  770.0,  852.0,  941.0];
static FREQUENCIES_HIGH: [f64; 4] = [1209.0, 1336.0, 1477.0, 1633.0];

// Row-major keypad: row selects the low tone, column the high tone.
static KEY_MAP: [&str; 16] = [
    "1", "2", "3", "A",
    "4", "5", "6", "B",
    "7", "8", "9", "C",
    "*", "0", "#", "D",
];

/// Dual-Tone Multi-Frequency keypad signaling.
#[derive(Copy, Clone, Debug, Default)]
pub struct Dtmf;

impl FrequencyScheme for Dtmf {
    fn name(&self) -> &'static str {
        "dtmf"
    }

    fn codes(&self) -> &[&'static str] {
        &KEY_MAP
    }

    fn pair(&self, index: usize) -> FrequencyPair {
        let columns = FREQUENCIES_HIGH.len();
        let row = index / columns;
        let column = index % columns;
        FrequencyPair::new(FREQUENCIES_LOW[row], FREQUENCIES_HIGH[column])
    }
}
