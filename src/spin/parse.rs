// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Spin-system parameter files.
//!
//! Each record is one line of the form
//!
//! ```text
//! Name (type) : value - comment
//! ```
//!
//! The type code and trailing comment are optional. Recognised names are
//! `SysName`, `NSpins`, `Omega` (MHz), `Iso(i)`, `v(i)` (Hz), `PPM(i)` and
//! `J(i,j)` (Hz). Indices are zero based.

use std::collections::HashMap;
use std::path::Path;

use ndarray::Array2;
use tracing::debug;

use super::isotope::Isotope;
use super::system::{Spin, SpinSystem};
use crate::error::{Error, Result};

/// One `Name (type) : value` record.
#[derive(Debug, Clone, PartialEq)]
struct Record<'a> {
    line: usize,
    key: &'a str,
    indices: Vec<usize>,
    value: &'a str,
}

enum Shift {
    Hz(f64),
    Ppm(f64),
}

/// Read and parse a spin-system file.
pub fn load(path: &Path) -> Result<SpinSystem> {
    let content = std::fs::read_to_string(path)?;
    let system = parse(&content)?;
    debug!(
        path = %path.display(),
        spins = system.len(),
        dimension = system.dimension(),
        "Loaded spin system"
    );
    Ok(system)
}

/// Parse the text of a spin-system file.
pub fn parse(content: &str) -> Result<SpinSystem> {
    let mut records = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        if let Some(record) = parse_line(idx + 1, raw)? {
            records.push(record);
        }
    }

    let mut name = String::from("spin_system");
    let mut omega: Option<f64> = None;
    let mut nspins: Option<usize> = None;

    for r in &records {
        match (r.key, r.indices.len()) {
            ("SysName", 0) => name = r.value.to_string(),
            ("Omega", 0) => omega = Some(parse_real(r)?),
            ("NSpins", 0) => {
                let n: usize = r.value.parse().map_err(|_| Error::Parse {
                    line: r.line,
                    message: format!("NSpins must be a positive integer, got '{}'", r.value),
                })?;
                if n == 0 {
                    return Err(Error::Parse {
                        line: r.line,
                        message: "NSpins must be > 0".into(),
                    });
                }
                nspins = Some(n);
            }
            _ => {}
        }
    }

    let n = nspins.ok_or_else(|| Error::Parse {
        line: 0,
        message: "missing NSpins record".into(),
    })?;

    let mut isotopes = vec![Isotope::default(); n];
    let mut shifts: HashMap<usize, (usize, Shift)> = HashMap::new();
    let mut couplings = Array2::<f64>::zeros((n, n));

    for r in &records {
        match (r.key, r.indices.as_slice()) {
            ("Iso", &[i]) => {
                check_index(r, i, n)?;
                isotopes[i] = r.value.parse::<Isotope>().map_err(|msg| Error::Parse {
                    line: r.line,
                    message: msg,
                })?;
            }
            ("v", &[i]) | ("PPM", &[i]) => {
                check_index(r, i, n)?;
                let value = parse_real(r)?;
                let shift = if r.key == "v" {
                    Shift::Hz(value)
                } else {
                    Shift::Ppm(value)
                };
                if shifts.insert(i, (r.line, shift)).is_some() {
                    return Err(Error::Parse {
                        line: r.line,
                        message: format!("duplicate shift for spin {i}"),
                    });
                }
            }
            ("J", &[i, j]) => {
                check_index(r, i, n)?;
                check_index(r, j, n)?;
                if i == j {
                    return Err(Error::Parse {
                        line: r.line,
                        message: format!("J({i},{j}) couples a spin to itself"),
                    });
                }
                let value = parse_real(r)?;
                couplings[[i, j]] = value;
                couplings[[j, i]] = value;
            }
            ("SysName" | "Omega" | "NSpins", &[]) => {}
            (key, _) => {
                debug!(line = r.line, key, "Ignoring unrecognised record");
            }
        }
    }

    let mut spins = Vec::with_capacity(n);
    for (i, isotope) in isotopes.into_iter().enumerate() {
        let shift_hz = match shifts.remove(&i) {
            None => {
                return Err(Error::Parse {
                    line: 0,
                    message: format!("no shift given for spin {i}"),
                })
            }
            Some((_, Shift::Hz(hz))) => hz,
            Some((line, Shift::Ppm(ppm))) => {
                let mhz = omega.ok_or_else(|| Error::Parse {
                    line,
                    message: "PPM shifts require an Omega record".into(),
                })?;
                ppm * mhz * isotope.relative_gamma()
            }
        };
        spins.push(Spin { isotope, shift_hz });
    }

    let system = SpinSystem::new(name, spins, couplings)?;
    Ok(match omega {
        Some(mhz) => system.with_spectrometer_mhz(mhz),
        None => system,
    })
}

fn parse_line(line: usize, raw: &str) -> Result<Option<Record<'_>>> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let (head, tail) = text.split_once(':').ok_or_else(|| Error::Parse {
        line,
        message: format!("expected 'Name (type) : value', got '{text}'"),
    })?;

    // Drop a trailing "(n)" type code from the head.
    let mut head = head.trim();
    if head.ends_with(')') {
        if let Some(open) = head.rfind('(') {
            let inner = &head[open + 1..head.len() - 1];
            if inner.trim().parse::<u8>().is_ok() && head[..open].ends_with(char::is_whitespace)
            {
                head = head[..open].trim_end();
            }
        }
    }

    let (key, indices) = match head.find('(') {
        None => (head, Vec::new()),
        Some(open) => {
            let close = head.rfind(')').filter(|&c| c > open).ok_or_else(|| Error::Parse {
                line,
                message: format!("unbalanced parentheses in '{head}'"),
            })?;
            let indices = head[open + 1..close]
                .split(',')
                .map(|s| {
                    s.trim().parse::<usize>().map_err(|_| Error::Parse {
                        line,
                        message: format!("invalid index '{}' in '{head}'", s.trim()),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            (head[..open].trim(), indices)
        }
    };

    let value = match tail.find(" - ") {
        Some(pos) => &tail[..pos],
        None => tail,
    }
    .trim();

    if key.is_empty() || value.is_empty() {
        return Err(Error::Parse {
            line,
            message: format!("empty name or value in '{text}'"),
        });
    }

    Ok(Some(Record {
        line,
        key,
        indices,
        value,
    }))
}

fn parse_real(r: &Record<'_>) -> Result<f64> {
    let value: f64 = r.value.parse().map_err(|_| Error::Parse {
        line: r.line,
        message: format!("'{}' is not a number", r.value),
    })?;
    if !value.is_finite() {
        return Err(Error::Parse {
            line: r.line,
            message: format!("'{}' is not finite", r.value),
        });
    }
    Ok(value)
}

fn check_index(r: &Record<'_>, idx: usize, n: usize) -> Result<()> {
    if idx >= n {
        return Err(Error::Parse {
            line: r.line,
            message: format!("spin index {idx} out of range for {n} spins"),
        });
    }
    Ok(())
}
