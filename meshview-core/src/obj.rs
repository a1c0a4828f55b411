/// Wavefront OBJ parser for the geometry subset: positions and faces
use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::ParseError;
use crate::geometry::MeshData;

/// One statement of an OBJ file that this parser cares about
#[derive(Debug, PartialEq)]
enum Statement {
    Position(f32, f32, f32),
    Face(Vec<i64>),
    Ignored,
}

/// Parse OBJ text into positions and a triangulated index list.
///
/// Faces with more than three corners are split into a triangle fan around
/// their first corner. Texture coordinates, normals, groups and material
/// statements are skipped.
pub fn parse_obj(input: &str) -> Result<MeshData, ParseError> {
    let mut mesh = MeshData::default();

    for (number, raw) in input.lines().enumerate() {
        let line_no = number + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        let statement = match statement(line) {
            Ok((_, statement)) => statement,
            Err(e) => return Err(ParseError::new(line_no, format!("malformed statement `{}`: {:?}", line, e))),
        };

        match statement {
            Statement::Position(x, y, z) => mesh.positions.extend_from_slice(&[x, y, z]),
            Statement::Face(refs) => {
                if refs.len() < 3 {
                    return Err(ParseError::new(line_no, "face needs at least three vertices"));
                }
                let declared = mesh.position_count();
                let corners = refs
                    .iter()
                    .map(|&r| resolve_index(r, declared).ok_or_else(|| {
                        ParseError::new(line_no, format!("vertex reference {} is invalid", r))
                    }))
                    .collect::<Result<Vec<u32>, _>>()?;

                for i in 1..corners.len() - 1 {
                    mesh.indices
                        .extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
                }
            }
            Statement::Ignored => {}
        }
    }

    Ok(mesh)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    }
}

/// Turn a 1-based (or negative, relative) OBJ reference into a 0-based index.
fn resolve_index(reference: i64, declared: usize) -> Option<u32> {
    let index = match reference {
        0 => return None,
        r if r > 0 => r - 1,
        r => declared as i64 + r,
    };
    if index < 0 {
        return None;
    }
    u32::try_from(index).ok()
}

fn statement(input: &str) -> IResult<&str, Statement> {
    let (rest, keyword) = take_while1(|c: char| !c.is_whitespace())(input)?;
    match keyword {
        "v" => all_consuming(position)(rest),
        "f" => all_consuming(face)(rest),
        _ => Ok(("", Statement::Ignored)),
    }
}

fn position(input: &str) -> IResult<&str, Statement> {
    let (input, (x, y, z)) = tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)?;
    // Optional homogeneous weight
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Statement::Position(x, y, z)))
}

fn face(input: &str) -> IResult<&str, Statement> {
    let (input, refs) = many1(preceded(space1, vertex_ref))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Statement::Face(refs)))
}

/// `p`, `p/t`, `p//n` or `p/t/n`; only the position reference is kept.
fn vertex_ref(input: &str) -> IResult<&str, i64> {
    terminated(
        signed_int,
        opt(pair(
            preceded(char('/'), opt(signed_int)),
            opt(preceded(char('/'), opt(signed_int))),
        )),
    )(input)
}

fn signed_int(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(tag("-")), digit1)), str::parse::<i64>)(input)
}
