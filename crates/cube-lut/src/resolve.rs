//! DaVinci Resolve .cube LUT format reader and writer.
//!
//! The Resolve dialect of the .cube format is line-oriented text. A
//! file can carry a 1D shaper table, a 3D cube table, or both in one
//! file, in which case the shaper rows come first and the cube rows
//! follow.
//!
//! # Format
//!
//! ```text
//! TITLE "LUT Name"
//! # Comment
//! LUT_1D_SIZE 4
//! LUT_1D_INPUT_RANGE 0.0000000 1.0000000
//! LUT_3D_SIZE 33
//! 0.0 0.0 0.0
//! ...
//! 1.0 1.0 1.0
//! ```
//!
//! Cube rows are flattened in axis-major order: the red grid index
//! varies fastest, the blue index slowest.
//!
//! # Example
//!
//! ```rust,ignore
//! use cube_lut::{resolve, Lut};
//!
//! match resolve::read("grade.cube")? {
//!     Lut::Shaper(s) => println!("1D shaper, {} rows", s.size()),
//!     Lut::Cube(c) => println!("3D cube, side {}", c.size),
//!     Lut::Sequence(sc) => println!("shaper + cube"),
//! }
//! ```

use crate::cube::{CUBE_MAX_SIZE, CUBE_MIN_SIZE};
use crate::shaper::{SHAPER_MAX_SIZE, SHAPER_MIN_SIZE};
use crate::{Cube, Domain, Lut, LutError, LutResult, Shaper, ShaperCube};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Fractional digits written per scalar when no precision is given.
pub const DEFAULT_DECIMALS: usize = 7;

/// Reads a Resolve .cube LUT from a file.
///
/// Returns a [`Lut::Shaper`], [`Lut::Cube`] or [`Lut::Sequence`]
/// depending on which size directives the file declares. When the
/// file has no `TITLE` line, the name is derived from the file stem
/// with `_`, `-` and `.` replaced by spaces.
///
/// # Example
///
/// ```rust,ignore
/// let lut = resolve::read("grade.cube")?;
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> LutResult<Lut> {
    let path = path.as_ref();
    let title = title_from_path(path);
    let file = File::open(path)?;
    parse(BufReader::new(file), &title)
}

/// Parses a Resolve .cube LUT from a reader.
///
/// `title` is the fallback display name used when the stream has no
/// `TITLE` line; [`read`] passes the normalized file stem.
pub fn parse<R: BufRead>(reader: R, title: &str) -> LutResult<Lut> {
    let mut title = title.to_string();
    let mut shaper_size = SHAPER_MIN_SIZE;
    let mut cube_size = CUBE_MIN_SIZE;
    let mut shaper_domain = Domain::default();
    let mut cube_domain = Domain::default();
    let mut rows: Vec<[f32; 3]> = Vec::new();
    let mut comments: Vec<String> = Vec::new();
    let mut has_shaper = false;
    let mut has_cube = false;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        // Comments accumulate in one flat list; the format does not
        // scope them to a stage.
        if let Some(comment) = line.strip_prefix('#') {
            comments.push(comment.trim().to_string());
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "TITLE" => title = unquote(&tokens[1..]),
            "LUT_1D_INPUT_RANGE" => shaper_domain = parse_range(&tokens)?,
            "LUT_3D_INPUT_RANGE" => cube_domain = parse_range(&tokens)?,
            "LUT_1D_SIZE" => {
                has_shaper = true;
                shaper_size = parse_size(&tokens)?;
            }
            "LUT_3D_SIZE" => {
                has_cube = true;
                cube_size = parse_size(&tokens)?;
            }
            _ => rows.push(parse_row(&tokens, line)?),
        }
    }

    if !has_shaper && !has_cube {
        return Err(LutError::Parse(
            "missing LUT_1D_SIZE or LUT_3D_SIZE directive".into(),
        ));
    }

    // Declared sizes must account for every data row. Truncating or
    // padding here would hide broken files. The cube row count is
    // computed checked: a declared size whose cube overflows usize can
    // never match a real file.
    let mut expected = if has_shaper { shaper_size } else { 0 };
    if has_cube {
        expected = cube_size
            .checked_mul(cube_size)
            .and_then(|n| n.checked_mul(cube_size))
            .and_then(|n| n.checked_add(expected))
            .ok_or_else(|| {
                LutError::Parse(format!("LUT_3D_SIZE {} is too large", cube_size))
            })?;
    }
    if rows.len() != expected {
        return Err(LutError::TableSizeMismatch {
            expected,
            found: rows.len(),
        });
    }

    match (has_shaper, has_cube) {
        (true, true) => {
            let cube_rows = rows.split_off(shaper_size);
            let shaper = Shaper {
                table: rows,
                domain: shaper_domain,
                name: format!("{} - Shaper", title),
                comments: Vec::new(),
            };
            let cube = Cube::from_rows(cube_rows, cube_size)?
                .with_domain(cube_domain)
                .with_name(format!("{} - Cube", title))
                .with_comments(comments);
            Ok(Lut::Sequence(ShaperCube::new(shaper, cube)))
        }
        (true, false) => Ok(Lut::Shaper(Shaper {
            table: rows,
            domain: shaper_domain,
            name: title,
            comments,
        })),
        (false, true) => Ok(Lut::Cube(
            Cube::from_rows(rows, cube_size)?
                .with_domain(cube_domain)
                .with_name(title)
                .with_comments(comments),
        )),
        (false, false) => unreachable!(),
    }
}

/// Writes a LUT to a Resolve .cube file at the default precision.
///
/// # Example
///
/// ```rust,ignore
/// let lut = Lut::Cube(Cube::identity(33));
/// resolve::write("identity.cube", &lut)?;
/// ```
pub fn write<P: AsRef<Path>>(path: P, lut: &Lut) -> LutResult<()> {
    write_with_decimals(path, lut, DEFAULT_DECIMALS)
}

/// Writes a LUT to a Resolve .cube file with `decimals` fractional
/// digits per scalar.
///
/// The file content is built fully in memory first, so a validation
/// failure never leaves a partially written file behind.
pub fn write_with_decimals<P: AsRef<Path>>(
    path: P,
    lut: &Lut,
    decimals: usize,
) -> LutResult<()> {
    let text = serialize(lut, decimals)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Serializes a LUT to the .cube text layout.
///
/// Fails if a present stage has a domain the format cannot express
/// (channels not sharing one min/max pair) or a size outside the
/// format's limits: [2, 65536] for the shaper, [2, 256] for the cube.
pub fn serialize(lut: &Lut, decimals: usize) -> LutResult<String> {
    let (shaper, cube) = match lut {
        Lut::Shaper(s) => (Some(s), None),
        Lut::Cube(c) => (None, Some(c)),
        Lut::Sequence(sc) => (Some(&sc.shaper), Some(&sc.cube)),
    };

    // The cube stage's name wins as the file title when both are present.
    let title = cube
        .map(|c| c.name.as_str())
        .or(shaper.map(|s| s.name.as_str()))
        .unwrap_or("");

    let shaper_range = match shaper {
        Some(s) => {
            let range = s
                .domain
                .endpoints()
                .ok_or(LutError::NonUniformDomain { stage: "shaper" })?;
            if !(SHAPER_MIN_SIZE..=SHAPER_MAX_SIZE).contains(&s.size()) {
                return Err(LutError::SizeOutOfRange {
                    stage: "shaper",
                    size: s.size(),
                    min: SHAPER_MIN_SIZE,
                    max: SHAPER_MAX_SIZE,
                });
            }
            Some(range)
        }
        None => None,
    };
    let cube_range = match cube {
        Some(c) => {
            let range = c
                .domain
                .endpoints()
                .ok_or(LutError::NonUniformDomain { stage: "cube" })?;
            if !(CUBE_MIN_SIZE..=CUBE_MAX_SIZE).contains(&c.size) {
                return Err(LutError::SizeOutOfRange {
                    stage: "cube",
                    size: c.size,
                    min: CUBE_MIN_SIZE,
                    max: CUBE_MAX_SIZE,
                });
            }
            if c.data.len() != c.entry_count() {
                return Err(LutError::TableSizeMismatch {
                    expected: c.entry_count(),
                    found: c.data.len(),
                });
            }
            Some(range)
        }
        None => None,
    };

    let mut out = String::new();
    out.push_str(&format!("TITLE \"{}\"\n", title));

    // Shaper comments first, then cube comments, whatever stage they
    // were parsed from. This keeps combined files deterministic.
    if let Some(s) = shaper {
        for comment in &s.comments {
            out.push_str(&format!("# {}\n", comment));
        }
    }
    if let Some(c) = cube {
        for comment in &c.comments {
            out.push_str(&format!("# {}\n", comment));
        }
    }

    if let (Some(s), Some((min, max))) = (shaper, shaper_range) {
        out.push_str(&format!("LUT_1D_SIZE {}\n", s.size()));
        if !s.domain.is_default() {
            out.push_str(&format!(
                "LUT_1D_INPUT_RANGE {:.prec$} {:.prec$}\n",
                min,
                max,
                prec = decimals
            ));
        }
    }
    if let (Some(c), Some((min, max))) = (cube, cube_range) {
        out.push_str(&format!("LUT_3D_SIZE {}\n", c.size));
        if !c.domain.is_default() {
            out.push_str(&format!(
                "LUT_3D_INPUT_RANGE {:.prec$} {:.prec$}\n",
                min,
                max,
                prec = decimals
            ));
        }
    }

    if let Some(s) = shaper {
        for row in &s.table {
            push_row(&mut out, row, decimals);
        }
        out.push('\n');
    }
    if let Some(c) = cube {
        // File order is axis-major: r varies fastest, b slowest.
        for b in 0..c.size {
            for g in 0..c.size {
                for r in 0..c.size {
                    push_row(&mut out, &c.get(r, g, b), decimals);
                }
            }
        }
    }

    Ok(out)
}

// Helper functions

fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.chars()
        .map(|c| if matches!(c, '_' | '-' | '.') { ' ' } else { c })
        .collect()
}

fn unquote(tokens: &[&str]) -> String {
    // The title is the rest of the line with the surrounding quote
    // marks dropped.
    let joined = tokens.join(" ");
    let mut chars = joined.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

fn parse_size(tokens: &[&str]) -> LutResult<usize> {
    if tokens.len() != 2 {
        return Err(LutError::Parse(format!(
            "{} expects one integer value",
            tokens[0]
        )));
    }
    tokens[1]
        .parse()
        .map_err(|_| LutError::Parse(format!("invalid size value: {}", tokens[1])))
}

fn parse_range(tokens: &[&str]) -> LutResult<Domain> {
    if tokens.len() != 3 {
        return Err(LutError::Parse(format!(
            "{} expects two values",
            tokens[0]
        )));
    }
    let min = parse_scalar(tokens[1])?;
    let max = parse_scalar(tokens[2])?;
    Ok(Domain::uniform(min, max))
}

fn parse_row(tokens: &[&str], line: &str) -> LutResult<[f32; 3]> {
    if tokens.len() != 3 {
        return Err(LutError::Parse(format!("invalid data row: {}", line)));
    }
    Ok([
        parse_scalar(tokens[0])?,
        parse_scalar(tokens[1])?,
        parse_scalar(tokens[2])?,
    ])
}

fn parse_scalar(token: &str) -> LutResult<f32> {
    token
        .parse()
        .map_err(|_| LutError::Parse(format!("invalid number: {}", token)))
}

fn push_row(out: &mut String, row: &[f32; 3], decimals: usize) {
    out.push_str(&format!(
        "{:.prec$} {:.prec$} {:.prec$}\n",
        row[0],
        row[1],
        row[2],
        prec = decimals
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn parse_shaper_only() {
        let text = "LUT_1D_SIZE 2\n0.0 0.0 0.0\n1.0 1.0 1.0\n";
        let lut = parse(Cursor::new(text), "ramp").expect("parse failed");

        match lut {
            Lut::Shaper(s) => {
                assert_eq!(s.size(), 2);
                assert_eq!(s.name, "ramp");
                assert!(s.domain.is_default());
                assert!(s.comments.is_empty());
            }
            other => panic!("expected shaper, got {:?}", other),
        }
    }

    #[test]
    fn parse_cube_only_ordering() {
        // Rows in file order (r fastest): the value at grid (r, g, b)
        // is [r, g, b] scaled to [0, 1].
        let mut text = String::from("LUT_3D_SIZE 2\n");
        for b in 0..2 {
            for g in 0..2 {
                for r in 0..2 {
                    text.push_str(&format!("{}.0 {}.0 {}.0\n", r, g, b));
                }
            }
        }
        let lut = parse(Cursor::new(text), "pattern").expect("parse failed");

        match lut {
            Lut::Cube(c) => {
                assert_eq!(c.size, 2);
                assert_eq!(c.get(1, 0, 0), [1.0, 0.0, 0.0]);
                assert_eq!(c.get(0, 1, 0), [0.0, 1.0, 0.0]);
                assert_eq!(c.get(0, 0, 1), [0.0, 0.0, 1.0]);
                assert_eq!(c.get(1, 1, 1), [1.0, 1.0, 1.0]);
            }
            other => panic!("expected cube, got {:?}", other),
        }
    }

    #[test]
    fn parse_combined_split() {
        let mut text = String::from("# Comments can't go anywhere\nLUT_1D_SIZE 4\nLUT_3D_SIZE 3\n");
        for i in 0..4 {
            let v = i as f32 / 3.0;
            text.push_str(&format!("{0} {0} {0}\n", v));
        }
        for i in 0..27 {
            let v = i as f32 / 26.0;
            text.push_str(&format!("{0} {0} {0}\n", v));
        }
        let lut = parse(Cursor::new(text), "Demo").expect("parse failed");

        match lut {
            Lut::Sequence(sc) => {
                assert_eq!(sc.shaper.size(), 4);
                assert_eq!(sc.shaper.name, "Demo - Shaper");
                assert!(sc.shaper.comments.is_empty());
                assert_eq!(sc.cube.size, 3);
                assert_eq!(sc.cube.name, "Demo - Cube");
                assert_eq!(sc.cube.comments, vec!["Comments can't go anywhere"]);
                // First cube row lands at grid (0, 0, 0), last at (2, 2, 2).
                assert_abs_diff_eq!(sc.cube.get(0, 0, 0)[0], 0.0, epsilon = 1e-6);
                assert_abs_diff_eq!(sc.cube.get(2, 2, 2)[0], 1.0, epsilon = 1e-6);
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn parse_title_and_range() {
        let text = "TITLE \"ACES Proxy\"\nLUT_1D_INPUT_RANGE -0.1 3.0\nLUT_1D_SIZE 2\n0.0 0.0 0.0\n1.0 1.0 1.0\n";
        let lut = parse(Cursor::new(text), "fallback").expect("parse failed");

        match lut {
            Lut::Shaper(s) => {
                assert_eq!(s.name, "ACES Proxy");
                assert_eq!(s.domain, Domain::uniform(-0.1, 3.0));
            }
            other => panic!("expected shaper, got {:?}", other),
        }
    }

    #[test]
    fn parse_missing_size_directive() {
        let text = "TITLE \"No Size\"\n0.0 0.0 0.0\n";
        let err = parse(Cursor::new(text), "t").unwrap_err();
        assert!(matches!(err, LutError::Parse(_)));
    }

    #[test]
    fn parse_row_count_mismatch() {
        let text = "LUT_1D_SIZE 4\n0.0 0.0 0.0\n1.0 1.0 1.0\n";
        let err = parse(Cursor::new(text), "t").unwrap_err();
        assert!(matches!(
            err,
            LutError::TableSizeMismatch {
                expected: 4,
                found: 2
            }
        ));
    }

    #[test]
    fn parse_huge_declared_size() {
        // A declared size whose cube overflows usize must surface as
        // an error, not an arithmetic panic.
        let text = "LUT_3D_SIZE 7000000000000\n0.0 0.0 0.0\n";
        let err = parse(Cursor::new(text), "t").unwrap_err();
        assert!(matches!(err, LutError::Parse(_)));
    }

    #[test]
    fn parse_bad_data_rows() {
        let short = "LUT_1D_SIZE 2\n0.0 0.0\n1.0 1.0 1.0\n";
        assert!(matches!(
            parse(Cursor::new(short), "t").unwrap_err(),
            LutError::Parse(_)
        ));

        let non_numeric = "LUT_1D_SIZE 2\n0.0 zero 0.0\n1.0 1.0 1.0\n";
        assert!(matches!(
            parse(Cursor::new(non_numeric), "t").unwrap_err(),
            LutError::Parse(_)
        ));
    }

    #[test]
    fn write_default_domain_omits_range() {
        let lut = Lut::Shaper(Shaper::identity(2).with_name("Ramp"));
        let text = serialize(&lut, 7).expect("serialize failed");

        assert!(text.starts_with("TITLE \"Ramp\"\n"));
        assert!(!text.contains("INPUT_RANGE"));
        assert!(text.contains("LUT_1D_SIZE 2\n"));
    }

    #[test]
    fn write_custom_range_at_precision() {
        let domain = Domain::uniform(-0.1, 3.0);
        let lut = Lut::Shaper(Shaper::linear_table(16, domain).with_name("My LUT"));
        let text = serialize(&lut, 7).expect("serialize failed");

        assert!(text.contains("LUT_1D_INPUT_RANGE -0.1000000 3.0000000\n"));
    }

    #[test]
    fn write_cube_axis_major_rows() {
        let lut = Lut::Cube(Cube::identity(3).with_name("Identity"));
        let text = serialize(&lut, 7).expect("serialize failed");

        let data_lines: Vec<&str> = text
            .lines()
            .filter(|l| !l.starts_with("TITLE") && !l.starts_with("LUT_") && !l.is_empty())
            .collect();
        assert_eq!(data_lines.len(), 27);
        // First S rows walk the red axis at g = 0, b = 0.
        assert_eq!(data_lines[0], "0.0000000 0.0000000 0.0000000");
        assert_eq!(data_lines[1], "0.5000000 0.0000000 0.0000000");
        assert_eq!(data_lines[2], "1.0000000 0.0000000 0.0000000");
        // Row S+1 steps the green axis.
        assert_eq!(data_lines[3], "0.0000000 0.5000000 0.0000000");
        // Last row is the white corner.
        assert_eq!(data_lines[26], "1.0000000 1.0000000 1.0000000");
    }

    #[test]
    fn write_combined_comment_order() {
        let seq = ShaperCube::new(
            Shaper::identity(4)
                .with_name("Demo - Shaper")
                .with_comments(vec!["from the shaper".to_string()]),
            Cube::identity(2)
                .with_name("Demo - Cube")
                .with_comments(vec!["from the cube".to_string()]),
        );
        let text = serialize(&Lut::Sequence(seq), 7).expect("serialize failed");

        assert!(text.starts_with("TITLE \"Demo - Cube\"\n"));
        let shaper_pos = text.find("# from the shaper").unwrap();
        let cube_pos = text.find("# from the cube").unwrap();
        assert!(shaper_pos < cube_pos);
        // Shaper block ends with a blank line before the cube rows.
        assert!(text.contains("\n\n"));
    }

    #[test]
    fn write_boundary_sizes_rejected() {
        let too_small = Lut::Shaper(Shaper::new(vec![[0.0; 3]], "t"));
        assert!(matches!(
            serialize(&too_small, 7).unwrap_err(),
            LutError::SizeOutOfRange { stage: "shaper", size: 1, .. }
        ));

        let too_big = Lut::Shaper(Shaper::new(vec![[0.0; 3]; 65537], "t"));
        assert!(matches!(
            serialize(&too_big, 7).unwrap_err(),
            LutError::SizeOutOfRange { stage: "shaper", size: 65537, .. }
        ));

        let cube_small = Lut::Cube(Cube {
            data: vec![[0.0; 3]],
            size: 1,
            domain: Domain::default(),
            name: String::new(),
            comments: Vec::new(),
        });
        assert!(matches!(
            serialize(&cube_small, 7).unwrap_err(),
            LutError::SizeOutOfRange { stage: "cube", size: 1, .. }
        ));

        let cube_big = Lut::Cube(Cube {
            data: Vec::new(),
            size: 257,
            domain: Domain::default(),
            name: String::new(),
            comments: Vec::new(),
        });
        assert!(matches!(
            serialize(&cube_big, 7).unwrap_err(),
            LutError::SizeOutOfRange { stage: "cube", size: 257, .. }
        ));
    }

    #[test]
    fn write_non_uniform_domain_rejected() {
        let domain = Domain {
            min: [0.0, 0.1, 0.0],
            max: [1.0, 1.0, 1.0],
        };
        let lut = Lut::Shaper(Shaper::identity(4).with_domain(domain));
        assert!(matches!(
            serialize(&lut, 7).unwrap_err(),
            LutError::NonUniformDomain { stage: "shaper" }
        ));
    }

    #[test]
    fn roundtrip_shaper_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.cube");

        let domain = Domain::uniform(-0.1, 3.0);
        let original = Shaper::linear_table(16, domain)
            .with_name("My Shaper")
            .with_comments(vec![
                "A first comment.".to_string(),
                "A second comment.".to_string(),
            ]);
        write(&path, &Lut::Shaper(original.clone())).expect("write failed");

        let lut = read(&path).expect("read failed");
        match lut {
            Lut::Shaper(s) => {
                assert_eq!(s.name, original.name);
                assert_eq!(s.comments, original.comments);
                assert_eq!(s.size(), original.size());
                assert_eq!(s.domain.endpoints(), Some((-0.1, 3.0)));
                for (got, want) in s.table.iter().zip(original.table.iter()) {
                    for ch in 0..3 {
                        assert_abs_diff_eq!(got[ch], want[ch], epsilon = 1e-6);
                    }
                }
            }
            other => panic!("expected shaper, got {:?}", other),
        }
    }

    #[test]
    fn roundtrip_combined_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("combined.cube");

        let seq = ShaperCube::new(
            Shaper::identity(4)
                .with_name("Grade - Shaper")
                .with_comments(vec!["shaper note".to_string()]),
            Cube::identity(3)
                .with_name("Grade - Cube")
                .with_comments(vec!["cube note".to_string()]),
        );
        write(&path, &Lut::Sequence(seq)).expect("write failed");

        let lut = read(&path).expect("read failed");
        match lut {
            Lut::Sequence(sc) => {
                assert_eq!(sc.shaper.size(), 4);
                assert_eq!(sc.cube.size, 3);
                // The flat comment list reattaches to the cube stage.
                assert!(sc.shaper.comments.is_empty());
                assert_eq!(sc.cube.comments, vec!["shaper note", "cube note"]);
                for i in 0..sc.cube.entry_count() {
                    let (r, g, b) = sc.cube.coords(i);
                    let got = sc.cube.get(r, g, b);
                    assert_abs_diff_eq!(got[0], r as f32 / 2.0, epsilon = 1e-6);
                    assert_abs_diff_eq!(got[1], g as f32 / 2.0, epsilon = 1e-6);
                    assert_abs_diff_eq!(got[2], b as f32 / 2.0, epsilon = 1e-6);
                }
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn title_from_filename() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ACES_Proxy-10.to.ACES.cube");
        std::fs::write(&path, "LUT_1D_SIZE 2\n0.0 0.0 0.0\n1.0 1.0 1.0\n").unwrap();

        let lut = read(&path).expect("read failed");
        assert_eq!(lut.name(), "ACES Proxy 10 to ACES");
    }
}
