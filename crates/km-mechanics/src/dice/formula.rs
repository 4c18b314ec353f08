//! Dice formula parsing and evaluation.

use std::fmt;
use std::str::FromStr;

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;
use serde::{Deserialize, Serialize};

use super::Die;
use super::lexer::{Token, lex};
use super::pool::DicePool;
use super::roll::DieResult;
use super::roller::DiceRoller;
use crate::error::{MechError, MechResult};

const MAX_DICE: u32 = 100;

/// Which option of a keep group survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    /// `kh`
    Highest,
    /// `kl`
    Lowest,
}

/// One summand of a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// `NdM`
    Dice {
        /// Number of dice.
        count: u32,
        /// Die type.
        die: Die,
    },
    /// A flat number.
    Flat(i32),
    /// `{a,b,...}kh` or `{a,b,...}kl`
    Group {
        /// Alternatives, each rolled in full.
        options: Vec<Formula>,
        /// Which total is kept.
        keep: Keep,
    },
}

/// A parsed dice formula such as `1d20+7` or `{1d20+7,15}kh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    terms: Vec<(bool, Term)>,
}

/// The evaluated total of a formula and the dice that made it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaRoll {
    /// Sum of the kept terms.
    pub total: i32,
    /// Faces of every kept die.
    pub dice: Vec<DieResult>,
}

impl Formula {
    /// A flat number.
    pub fn flat(value: i32) -> Self {
        let term = match value.checked_abs() {
            Some(magnitude) => (value < 0, Term::Flat(magnitude)),
            None => (false, Term::Flat(value)),
        };
        Self { terms: vec![term] }
    }

    /// `NdM` with no modifier.
    pub fn dice(count: u32, die: Die) -> Self {
        Self {
            terms: vec![(false, Term::Dice { count, die })],
        }
    }

    /// The summands, each with a flag set when it is subtracted.
    pub fn terms(&self) -> &[(bool, Term)] {
        &self.terms
    }

    /// Whether the formula rolls any dice.
    pub fn has_dice(&self) -> bool {
        self.terms.iter().any(|(_, t)| match t {
            Term::Dice { .. } => true,
            Term::Flat(_) => false,
            Term::Group { options, .. } => options.iter().any(Formula::has_dice),
        })
    }

    /// Roll the formula.
    pub fn roll<R: DiceRoller + ?Sized>(&self, roller: &mut R) -> MechResult<FormulaRoll> {
        let mut total: i32 = 0;
        let mut dice = Vec::new();
        for (negative, term) in &self.terms {
            let (value, mut rolled) = match term {
                Term::Flat(n) => (*n, Vec::new()),
                Term::Dice { count, die } => {
                    let result = DicePool::new().add(*die, *count).roll(roller)?;
                    let sum = result
                        .dice
                        .iter()
                        .try_fold(0i32, |acc, d| {
                            i32::try_from(d.value).ok().and_then(|v| acc.checked_add(v))
                        })
                        .ok_or_else(|| self.out_of_range())?;
                    (sum, result.dice)
                }
                Term::Group { options, keep } => {
                    let mut best: Option<FormulaRoll> = None;
                    for option in options {
                        let rolled = option.roll(roller)?;
                        let better = match (&best, keep) {
                            (None, _) => true,
                            (Some(b), Keep::Highest) => rolled.total > b.total,
                            (Some(b), Keep::Lowest) => rolled.total < b.total,
                        };
                        if better {
                            best = Some(rolled);
                        }
                    }
                    let kept = best.unwrap_or(FormulaRoll {
                        total: 0,
                        dice: Vec::new(),
                    });
                    (kept.total, kept.dice)
                }
            };
            total = if *negative {
                total.checked_sub(value)
            } else {
                total.checked_add(value)
            }
            .ok_or_else(|| self.out_of_range())?;
            dice.append(&mut rolled);
        }
        Ok(FormulaRoll { total, dice })
    }

    fn out_of_range(&self) -> MechError {
        MechError::InvalidFormula {
            formula: self.to_string(),
            reason: "total out of range".to_string(),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (negative, term)) in self.terms.iter().enumerate() {
            if *negative {
                f.write_str("-")?;
            } else if i > 0 {
                f.write_str("+")?;
            }
            match term {
                Term::Flat(n) => write!(f, "{n}")?,
                Term::Dice { count, die } => write!(f, "{count}{die}")?,
                Term::Group { options, keep } => {
                    let inner: Vec<String> = options.iter().map(|o| o.to_string()).collect();
                    let suffix = match keep {
                        Keep::Highest => "kh",
                        Keep::Lowest => "kl",
                    };
                    write!(f, "{{{}}}{suffix}", inner.join(","))?;
                }
            }
        }
        Ok(())
    }
}

fn dice_term(count: u32, sides: u32) -> Result<Term, String> {
    let die = Die::from_sides(sides).ok_or("dice need two sides")?;
    if count > MAX_DICE {
        return Err(format!("at most {MAX_DICE} dice per term"));
    }
    Ok(Term::Dice { count, die })
}

/// The formula grammar: a signed sum of dice, numbers and keep groups.
fn formula_parser<'a, I>() -> impl Parser<'a, I, Formula, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|formula| {
        let number = select! { Token::Number(n) => Term::Flat(n) }.labelled("number");
        let dice = select! { Token::Dice { count, sides } => (count, sides) }
            .try_map(|(count, sides), span| {
                dice_term(count, sides).map_err(|reason| Rich::custom(span, reason))
            })
            .labelled("dice");
        let keep = choice((
            just(Token::KeepHighest).to(Keep::Highest),
            just(Token::KeepLowest).to(Keep::Lowest),
        ))
        .labelled("'kh' or 'kl'");
        let group = formula
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<Formula>>()
            .delimited_by(just(Token::LBrace), just(Token::RBrace))
            .then(keep)
            .map(|(options, keep)| Term::Group { options, keep });
        let term = choice((dice, number, group)).labelled("term");
        let sign = choice((just(Token::Plus).to(false), just(Token::Minus).to(true)));

        sign.clone()
            .or_not()
            .map(|negative| negative.unwrap_or(false))
            .then(term.clone())
            .then(sign.then(term).repeated().collect::<Vec<_>>())
            .map(|(first, rest)| Formula {
                terms: std::iter::once(first).chain(rest).collect(),
            })
    })
}

impl FromStr for Formula {
    type Err = MechError;

    fn from_str(s: &str) -> MechResult<Self> {
        let invalid = |reason: String| MechError::InvalidFormula {
            formula: s.to_string(),
            reason,
        };
        let tokens = lex(s).map_err(|e| invalid(e.message))?;

        let eoi: SimpleSpan = (s.len()..s.len()).into();
        let stream = Stream::from_iter(
            tokens
                .into_iter()
                .map(|(token, span)| (token, SimpleSpan::from(span))),
        )
        .map(eoi, |(token, span): (_, _)| (token, span));

        let (output, errors) = formula_parser()
            .then_ignore(end())
            .parse(stream)
            .into_output_errors();
        match output {
            Some(formula) if errors.is_empty() => Ok(formula),
            _ => {
                let reasons: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                Err(invalid(if reasons.is_empty() {
                    "unexpected end of formula".to_string()
                } else {
                    reasons.join("; ")
                }))
            }
        }
    }
}
