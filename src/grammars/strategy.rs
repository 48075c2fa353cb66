//! Rounds of a hand game: one opponent move and one response per line.
//!
//! ```text
//! A Y
//! B X
//! C Z
//! ```
//!
//! Both columns decode to [`Move`]. The `outcome` variant reads the second
//! column as the desired [`Outcome`] instead and derives the response move
//! from the opponent's move already on the stack.

use crate::combinators::{optional, sequence_of};
use crate::driver::parse_till_end;
use crate::errors::ParseError;
use crate::keyword::{keyword, KeywordSet};
use crate::matchers::{line_end, space};
use crate::parser::Parser;
use crate::record::{to_record, FieldSpec, RecordShape};
use crate::state::ParseState;
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// The move this one defeats.
    pub fn beats(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Paper => Move::Rock,
            Move::Scissors => Move::Paper,
        }
    }

    /// The move that defeats this one.
    pub fn loses_to(self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }
}

impl KeywordSet for Move {
    const FAMILY: &'static str = "Move";

    fn table() -> Vec<(&'static str, Self)> {
        vec![
            ("A", Move::Rock),
            ("B", Move::Paper),
            ("C", Move::Scissors),
            ("X", Move::Rock),
            ("Y", Move::Paper),
            ("Z", Move::Scissors),
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Lose,
    Draw,
    Win,
}

impl Outcome {
    pub fn response_to(self, opponent: Move) -> Move {
        match self {
            Outcome::Lose => opponent.beats(),
            Outcome::Draw => opponent,
            Outcome::Win => opponent.loses_to(),
        }
    }
}

impl KeywordSet for Outcome {
    const FAMILY: &'static str = "Outcome";

    fn table() -> Vec<(&'static str, Self)> {
        vec![("X", Outcome::Lose), ("Y", Outcome::Draw), ("Z", Outcome::Win)]
    }

    fn name(self) -> &'static str {
        match self {
            Outcome::Lose => "Lose",
            Outcome::Draw => "Draw",
            Outcome::Win => "Win",
        }
    }
}

pub fn round_shape() -> RecordShape {
    RecordShape::new(
        "Round",
        vec![
            FieldSpec::required("opponent", ValueType::Keyword(Move::FAMILY)),
            FieldSpec::required("response", ValueType::Keyword(Move::FAMILY)),
        ],
    )
}

fn round(response: Parser) -> Parser {
    to_record(
        round_shape(),
        sequence_of([keyword::<Move>(), space(), response, optional(line_end())]),
    )
}

/// `parse_till_end(to_record(Round, [move, space, move, line_end?]))`
pub fn grammar() -> Parser {
    parse_till_end(round(keyword::<Move>()))
}

pub fn outcome_grammar() -> Parser {
    parse_till_end(round(outcome_response()))
}

/// Reads an [`Outcome`] and pushes the [`Move`] that produces it against the
/// opponent move on top of the stack.
pub fn outcome_response() -> Parser {
    let outcome = keyword::<Outcome>();
    Parser::new(
        format!("outcome_response({})", outcome.label()),
        move |state: ParseState| {
            let mut next = outcome.parse(state);
            if next.is_failed() {
                return next;
            }
            let Some(wanted) = next.pop_last().as_ref().and_then(Outcome::from_value) else {
                return next.fail(ParseError::custom("Expected an outcome keyword"));
            };
            match next.stack().last().and_then(Move::from_value) {
                Some(opponent) => {
                    next.push(wanted.response_to(opponent).keyword());
                    next
                }
                None => {
                    let found = next.stack().last().map_or("nothing", Value::type_name);
                    next.fail(ParseError::custom(format!(
                        "Expected opponent move of type keyword Move but got: {}",
                        found
                    )))
                }
            }
        },
    )
}
