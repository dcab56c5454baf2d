//! Line parsers for the MEME minimal grammar.

use liquimotif::abc::ALPHABET_SIZE;

use nom::bytes::complete::tag;
use nom::bytes::complete::take_while1;
use nom::character::complete::char;
use nom::character::complete::multispace1;
use nom::character::complete::one_of;
use nom::character::complete::space0;
use nom::character::complete::space1;
use nom::multi::count;
use nom::multi::many0;
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::pair;
use nom::sequence::preceded;
use nom::sequence::separated_pair;
use nom::sequence::terminated;
use nom::IResult;

/// The letter/frequency pairs of a background frequency line.
pub fn background_pairs(input: &str) -> IResult<&str, Vec<(char, f64)>> {
    preceded(
        space0,
        separated_list1(
            multispace1,
            separated_pair(one_of("ACGTacgt"), multispace1, double),
        ),
    )(input)
}

/// The motif name on a `MOTIF <name> [alt]` line.
pub fn motif_name(input: &str) -> IResult<&str, &str> {
    preceded(
        pair(tag("MOTIF"), space1),
        take_while1(|c: char| !c.is_whitespace()),
    )(input)
}

/// A `key= value` field from a matrix header line.
fn header_field(input: &str) -> IResult<&str, (&str, f64)> {
    separated_pair(
        take_while1(|c: char| c.is_ascii_alphanumeric()),
        terminated(char('='), space0),
        double,
    )(input)
}

/// The fields of a `letter-probability matrix:` header line.
pub fn matrix_header(input: &str) -> IResult<&str, Vec<(&str, f64)>> {
    preceded(
        tag("letter-probability matrix:"),
        many0(preceded(multispace1, header_field)),
    )(input)
}

/// A row of four letter probabilities.
pub fn matrix_row(input: &str) -> IResult<&str, [f64; ALPHABET_SIZE]> {
    let (rest, values) = count(preceded(space0, double), ALPHABET_SIZE)(input)?;
    Ok((rest, [values[0], values[1], values[2], values[3]]))
}
