/// STL parser for binary and ASCII formats
///
/// STL stores an unindexed triangle soup. Corners with bit-identical
/// coordinates are welded into shared vertices so that the loader can smooth
/// normals across facets. The per-facet normals stored in the file are
/// skipped.
use std::collections::HashMap;

use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::ParseError;
use crate::geometry::MeshData;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

type Corner = [f32; 3];

/// Builds an indexed mesh out of triangle soup by welding equal corners
#[derive(Default)]
struct Welder {
    mesh: MeshData,
    seen: HashMap<[u32; 3], u32>,
}

impl Welder {
    fn with_capacity(triangles: usize) -> Self {
        let mut welder = Self::default();
        welder.mesh.indices.reserve(triangles * 3);
        welder
    }

    fn push_triangle(&mut self, corners: [Corner; 3]) {
        for corner in corners {
            let index = self.vertex(corner);
            self.mesh.indices.push(index);
        }
    }

    fn vertex(&mut self, corner: Corner) -> u32 {
        // -0.0 and 0.0 weld together
        let key = corner.map(|c| if c == 0.0 { 0 } else { c.to_bits() });
        let next = self.mesh.position_count() as u32;
        let positions = &mut self.mesh.positions;
        *self.seen.entry(key).or_insert_with(|| {
            positions.extend_from_slice(&corner);
            next
        })
    }

    fn finish(self) -> MeshData {
        self.mesh
    }
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<MeshData, ParseError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(ParseError::new(0, "file too small to be a valid STL"));
    }

    let body = &data[HEADER_LEN..];
    let triangle_count = u32::from_le_bytes([body[0], body[1], body[2], body[3]]) as usize;
    let facets = &body[4..];

    let needed = triangle_count.checked_mul(FACET_LEN);
    if needed.map_or(true, |needed| facets.len() < needed) {
        return Err(ParseError::new(
            0,
            format!(
                "header declares {} triangles but only {} bytes of facet data follow",
                triangle_count,
                facets.len()
            ),
        ));
    }

    let mut welder = Welder::with_capacity(triangle_count);
    for facet in facets.chunks_exact(FACET_LEN).take(triangle_count) {
        // 12 bytes normal, 3 x 12 bytes corners, 2 bytes attributes
        let corner = |n: usize| -> Corner {
            let at = 12 + n * 12;
            [
                read_f32(facet, at),
                read_f32(facet, at + 4),
                read_f32(facet, at + 8),
            ]
        };
        welder.push_triangle([corner(0), corner(1), corner(2)]);
    }

    Ok(welder.finish())
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<MeshData, ParseError> {
    match solid(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => {
            // Point at the line where parsing stopped
            let remaining = match &e {
                nom::Err::Error(inner) | nom::Err::Failure(inner) => inner.input.len(),
                nom::Err::Incomplete(_) => 0,
            };
            let consumed = &input[..input.len() - remaining];
            let line = consumed.matches('\n').count() + 1;
            Err(ParseError::new(line, format!("failed to parse ASCII STL: {:?}", e.map(|inner| inner.code))))
        }
    }
}

fn solid(input: &str) -> IResult<&str, MeshData> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // Optional name runs to the end of the line
    let (input, _) = take_till(|c: char| c == '\n')(input)?;
    let (input, facets) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut welder = Welder::with_capacity(facets.len());
    for corners in facets {
        welder.push_triangle(corners);
    }

    Ok((input, welder.finish()))
}

fn facet(input: &str) -> IResult<&str, [Corner; 3]> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, (a, b, c)) = tuple((vertex, vertex, vertex))(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [a, b, c]))
}

fn vertex(input: &str) -> IResult<&str, Corner> {
    preceded(preceded(multispace0, tag("vertex")), vector3)(input)
}

fn vector3(input: &str) -> IResult<&str, Corner> {
    let (input, (x, y, z)) = tuple((
        preceded(multispace1, float),
        preceded(multispace1, float),
        preceded(multispace1, float),
    ))(input)?;
    Ok((input, [x, y, z]))
}

/// Detect and parse STL data (ASCII when it starts with `solid` and parses as
/// such, binary otherwise)
///
/// Binary files may also begin with `solid`, so a failed ASCII parse falls back
/// to binary. If both fail, the line-numbered ASCII error is returned.
pub fn parse_stl(data: &[u8]) -> Result<MeshData, ParseError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            return match parse_ascii_stl(text) {
                Ok(mesh) => Ok(mesh),
                Err(ascii_error) => parse_binary_stl(data).map_err(|_| ascii_error),
            };
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(triangles: &[[Corner; 3]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for triangle in triangles {
            data.extend_from_slice(&[0u8; 12]);
            for corner in triangle {
                for c in corner {
                    data.extend_from_slice(&c.to_le_bytes());
                }
            }
            data.extend_from_slice(&[0u8; 2]);
        }
        data
    }

    const QUAD: [[Corner; 3]; 2] = [
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    ];

    #[test]
    fn test_parse_binary_header() {
        let mesh = parse_binary_stl(&binary(&[])).unwrap();
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_binary_corners_are_welded() {
        let mesh = parse_binary_stl(&binary(&QUAD)).unwrap();
        assert_eq!(mesh.position_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        let mut data = binary(&QUAD);
        data.truncate(data.len() - 10);
        assert!(parse_binary_stl(&data).is_err());
    }

    #[test]
    fn test_oversized_triangle_count_is_rejected() {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        data.extend_from_slice(&[0u8; FACET_LEN]);
        assert!(parse_binary_stl(&data).is_err());
    }

    #[test]
    fn test_malformed_ascii_keeps_ascii_error() {
        let src = "solid broken
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
    endloop
  endfacet
endsolid broken
";
        let err = parse_stl(src.as_bytes()).unwrap_err();
        assert!(err.line >= 1);
        assert!(err.message.contains("ASCII"), "{}", err.message);
    }

    #[test]
    fn test_parse_ascii() {
        let src = "solid quad
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 1 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid quad
";
        let mesh = parse_stl(src.as_bytes()).unwrap();
        assert_eq!(mesh.position_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_signed_zero_welds() {
        let mesh = parse_binary_stl(&binary(&[
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[-0.0, 0.0, -0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        ]))
        .unwrap();
        assert_eq!(mesh.position_count(), 3);
    }
}
