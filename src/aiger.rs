// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! AIGER circuit loader.
//!
//! Reads both the ASCII (`aag`) and the binary (`aig`) variants of the
//! AIGER format, including latches and the symbol table. Latch reset
//! values other than 0 are rejected: the analysis model initializes
//! every register to 0 at the first cycle.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::aig::{Aig, DriverType, Latch};
use crate::error::AigerError;

struct Header {
    m: usize,
    i: usize,
    l: usize,
    o: usize,
    a: usize,
    binary: bool,
}

fn parse_usize(tok: &str) -> Result<usize, AigerError> {
    tok.parse::<usize>()
        .map_err(|_| AigerError::Literal(format!("expected unsigned integer, got `{}`", tok)))
}

fn parse_header(line: &str) -> Result<Header, AigerError> {
    let toks: Vec<&str> = line.split_whitespace().collect();
    if toks.len() != 6 {
        return Err(AigerError::Header(format!(
            "expected `aag|aig M I L O A`, got `{}`",
            line.trim_end()
        )));
    }
    let binary = match toks[0] {
        "aag" => false,
        "aig" => true,
        other => {
            return Err(AigerError::Header(format!(
                "unknown format tag `{}`",
                other
            )))
        }
    };
    let m = parse_usize(toks[1])?;
    let i = parse_usize(toks[2])?;
    let l = parse_usize(toks[3])?;
    let o = parse_usize(toks[4])?;
    let a = parse_usize(toks[5])?;
    if m < i + l + a {
        return Err(AigerError::Header(format!(
            "node count {} below I+L+A = {}",
            m,
            i + l + a
        )));
    }
    Ok(Header {
        m,
        i,
        l,
        o,
        a,
        binary,
    })
}

fn read_line_io(reader: &mut impl BufRead, line: &mut String) -> Result<(), AigerError> {
    line.clear();
    reader.read_line(line).map_err(|e| AigerError::Io {
        path: "<stream>".into(),
        source: e,
    })?;
    if line.is_empty() {
        return Err(AigerError::Header("unexpected end of file".into()));
    }
    Ok(())
}

/// One LEB128-style delta of the binary and-gate section.
fn read_delta(reader: &mut impl Read) -> Result<usize, AigerError> {
    let mut delta = 0usize;
    let mut shift = 0u32;
    loop {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte).map_err(|e| AigerError::Io {
            path: "<stream>".into(),
            source: e,
        })?;
        delta |= ((byte[0] & 0x7f) as usize) << shift;
        if byte[0] & 0x80 == 0 {
            return Ok(delta);
        }
        shift += 7;
        if shift > 63 {
            return Err(AigerError::Literal("binary delta overflows".into()));
        }
    }
}

/// Load an AIGER circuit from a file path. The format variant is taken
/// from the header, not the file extension.
pub fn from_file(path: &Path) -> Result<Aig, AigerError> {
    let file = std::fs::File::open(path).map_err(|e| AigerError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    from_reader(BufReader::new(file))
}

/// Load an AIGER circuit from an in-memory string (ASCII variant only in
/// practice, but the header decides).
pub fn from_str(src: &str) -> Result<Aig, AigerError> {
    from_reader(BufReader::new(src.as_bytes()))
}

pub fn from_reader(mut reader: impl BufRead) -> Result<Aig, AigerError> {
    let mut line = String::new();
    read_line_io(&mut reader, &mut line)?;
    let header = parse_header(&line)?;

    let mut aig = Aig {
        num_nodes: header.m + 1,
        drivers: vec![DriverType::Tie0; header.m + 1],
        ..Default::default()
    };

    // inputs
    if header.binary {
        for ord in 0..header.i {
            let node = ord + 1;
            aig.drivers[node] = DriverType::InputPort(ord);
            aig.inputs.push(node);
        }
    } else {
        for ord in 0..header.i {
            read_line_io(&mut reader, &mut line)?;
            let lit = parse_usize(line.trim())?;
            if lit & 1 == 1 || lit >> 1 == 0 || lit >> 1 > header.m {
                return Err(AigerError::Literal(format!("bad input literal {}", lit)));
            }
            let node = lit >> 1;
            aig.drivers[node] = DriverType::InputPort(ord);
            aig.inputs.push(node);
        }
    }

    // latches: `[q] next [init]` (ascii) or `next [init]` (binary)
    for idx in 0..header.l {
        read_line_io(&mut reader, &mut line)?;
        let toks: Vec<&str> = line.split_whitespace().collect();
        let (q, rest) = if header.binary {
            (header.i + idx + 1, &toks[..])
        } else {
            if toks.is_empty() {
                return Err(AigerError::Literal("empty latch line".into()));
            }
            let q_lit = parse_usize(toks[0])?;
            if q_lit & 1 == 1 || q_lit >> 1 == 0 || q_lit >> 1 > header.m {
                return Err(AigerError::Literal(format!("bad latch literal {}", q_lit)));
            }
            (q_lit >> 1, &toks[1..])
        };
        if rest.is_empty() {
            return Err(AigerError::Literal("latch without next-state".into()));
        }
        let d_iv = parse_usize(rest[0])?;
        if d_iv >> 1 > header.m {
            return Err(AigerError::Literal(format!(
                "latch next-state literal {} out of range",
                d_iv
            )));
        }
        if let Some(init) = rest.get(1) {
            let init = parse_usize(init)?;
            if init != 0 {
                return Err(AigerError::Unsupported(format!(
                    "latch reset value {} (only 0 is modeled)",
                    init
                )));
            }
        }
        aig.drivers[q] = DriverType::Latch(idx);
        aig.latches.push(Latch { d_iv, q });
    }

    // outputs
    for _ in 0..header.o {
        read_line_io(&mut reader, &mut line)?;
        let o_iv = parse_usize(line.trim())?;
        if o_iv >> 1 > header.m {
            return Err(AigerError::Literal(format!(
                "output literal {} out of range",
                o_iv
            )));
        }
        aig.outputs.push(o_iv);
    }

    // and gates
    if header.binary {
        for i in 0..header.a {
            let lhs = 2 * (header.i + header.l + i + 1);
            let delta0 = read_delta(&mut reader)?;
            if delta0 > lhs {
                return Err(AigerError::Literal(format!(
                    "and-gate delta {} exceeds lhs {}",
                    delta0, lhs
                )));
            }
            let rhs0 = lhs - delta0;
            let delta1 = read_delta(&mut reader)?;
            if delta1 > rhs0 {
                return Err(AigerError::Literal(format!(
                    "and-gate delta {} exceeds rhs0 {}",
                    delta1, rhs0
                )));
            }
            let rhs1 = rhs0 - delta1;
            aig.drivers[lhs >> 1] = DriverType::AndGate(rhs0, rhs1);
        }
    } else {
        for _ in 0..header.a {
            read_line_io(&mut reader, &mut line)?;
            let toks: Vec<&str> = line.split_whitespace().collect();
            if toks.len() != 3 {
                return Err(AigerError::Literal(format!(
                    "and-gate line `{}` needs 3 literals",
                    line.trim_end()
                )));
            }
            let lhs = parse_usize(toks[0])?;
            let rhs0 = parse_usize(toks[1])?;
            let rhs1 = parse_usize(toks[2])?;
            if lhs & 1 == 1 || lhs >> 1 == 0 || lhs >> 1 > header.m {
                return Err(AigerError::Literal(format!("bad and-gate lhs {}", lhs)));
            }
            if rhs0 >> 1 > header.m || rhs1 >> 1 > header.m {
                return Err(AigerError::Literal(format!(
                    "and-gate rhs out of range on `{}`",
                    line.trim_end()
                )));
            }
            aig.drivers[lhs >> 1] = DriverType::AndGate(rhs0, rhs1);
        }
    }

    // symbol table, until `c` (comment) or end of file
    aig.input_names = vec![None; header.i];
    aig.latch_names = vec![None; header.l];
    aig.output_names = vec![None; header.o];
    loop {
        line.clear();
        let n = reader.read_line(&mut line).map_err(|e| AigerError::Io {
            path: "<stream>".into(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        let trimmed = line.trim_end();
        if trimmed == "c" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let (tag, name) = match trimmed.split_once(' ') {
            Some(pair) => pair,
            None => continue,
        };
        if tag.is_empty() {
            continue;
        }
        let (kind, ord) = tag.split_at(1);
        let ord = match ord.parse::<usize>() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let slot = match kind {
            "i" => aig.input_names.get_mut(ord),
            "l" => aig.latch_names.get_mut(ord),
            "o" => aig.output_names.get_mut(ord),
            _ => None,
        };
        if let Some(slot) = slot {
            *slot = Some(name.to_string());
        }
    }

    // gates must be declared after the gates they read: downstream
    // passes use index order as a topological order
    for g in 1..=header.m {
        if let DriverType::AndGate(a_iv, b_iv) = aig.drivers[g] {
            for f_iv in [a_iv, b_iv] {
                let p = f_iv >> 1;
                if p >= g && aig.is_and_gate(p) {
                    return Err(AigerError::Unsupported(format!(
                        "and gate {} reads gate {} declared after it",
                        g, p
                    )));
                }
            }
        }
    }

    aig.finalize();
    clilog::debug!(
        "loaded AIG: {} nodes, {} inputs, {} latches, {} outputs, depth {}",
        aig.num_nodes,
        aig.inputs.len(),
        aig.latches.len(),
        aig.outputs.len(),
        aig.depth
    );
    Ok(aig)
}
