use std::{
    io::{self, BufRead, Write},
    time::{SystemTime, UNIX_EPOCH},
};

/// What the built-in functions talk to. Tests swap in a recording host to
/// capture `print` and script `input`.
pub trait Host {
    fn print(&mut self, text: &str);
    fn input(&mut self) -> String;
    /// A value in `0..max`, or 0 when `max` is not positive.
    fn random(&mut self, max: i32) -> i32;
}

/// Standard streams and a time-seeded linear congruential generator.
#[derive(Debug)]
pub struct StdHost {
    seed: u64,
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StdHost {
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0x2545_F491_4F6C_DD1D);
        StdHost { seed }
    }
}

impl Host for StdHost {
    fn print(&mut self, text: &str) {
        println!("{text}");
    }

    fn input(&mut self) -> String {
        if let Err(e) = io::stdout().flush() {
            log::warn!("failed to flush stdout: {e}");
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => line.trim_end_matches(['\r', '\n']).to_string(),
            Err(e) => {
                log::warn!("failed to read input: {e}");
                String::new()
            }
        }
    }

    fn random(&mut self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }

        self.seed = self
            .seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.seed >> 33) % max as u64) as i32
    }
}
