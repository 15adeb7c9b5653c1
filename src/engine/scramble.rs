use std::fmt;

use rand::Rng;

pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    R,
    L,
    U,
    D,
    F,
    B,
}

impl Face {
    pub fn as_char(self) -> char {
        match self {
            Face::R => 'R',
            Face::L => 'L',
            Face::U => 'U',
            Face::D => 'D',
            Face::F => 'F',
            Face::B => 'B',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Plain,
    Prime,
    Double,
}

impl Modifier {
    pub fn suffix(self) -> &'static str {
        match self {
            Modifier::Plain => "",
            Modifier::Prime => "'",
            Modifier::Double => "2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub modifier: Modifier,
}

impl Move {
    const fn new(face: Face, modifier: Modifier) -> Self {
        Self { face, modifier }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.as_char(), self.modifier.suffix())
    }
}

/// The 18 face turns of a 3x3, grouped by face.
pub const MOVES: [Move; 18] = [
    Move::new(Face::R, Modifier::Plain),
    Move::new(Face::R, Modifier::Prime),
    Move::new(Face::R, Modifier::Double),
    Move::new(Face::L, Modifier::Plain),
    Move::new(Face::L, Modifier::Prime),
    Move::new(Face::L, Modifier::Double),
    Move::new(Face::U, Modifier::Plain),
    Move::new(Face::U, Modifier::Prime),
    Move::new(Face::U, Modifier::Double),
    Move::new(Face::D, Modifier::Plain),
    Move::new(Face::D, Modifier::Prime),
    Move::new(Face::D, Modifier::Double),
    Move::new(Face::F, Modifier::Plain),
    Move::new(Face::F, Modifier::Prime),
    Move::new(Face::F, Modifier::Double),
    Move::new(Face::B, Modifier::Plain),
    Move::new(Face::B, Modifier::Prime),
    Move::new(Face::B, Modifier::Double),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scramble {
    moves: Vec<Move>,
}

impl Scramble {
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl fmt::Display for Scramble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{mv}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ScrambleGenerator {
    length: usize,
}

impl ScrambleGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn set_length(&mut self, length: usize) {
        self.length = length;
    }

    /// Draw uniformly from the 18 turns, redrawing whenever the face
    /// matches the previous move. Opposite-face sequences like `R L R`
    /// are allowed.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Scramble {
        let mut moves: Vec<Move> = Vec::with_capacity(self.length);
        let mut last_face: Option<Face> = None;

        while moves.len() < self.length {
            let mv = MOVES[rng.gen_range(0..MOVES.len())];
            if Some(mv.face) == last_face {
                continue;
            }
            last_face = Some(mv.face);
            moves.push(mv);
        }

        Scramble { moves }
    }
}

impl Default for ScrambleGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SCRAMBLE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_default_length_is_twenty() {
        let mut rng = SmallRng::seed_from_u64(7);
        let scramble = ScrambleGenerator::default().generate(&mut rng);
        assert_eq!(scramble.len(), 20);
    }

    #[test]
    fn test_no_consecutive_moves_share_a_face() {
        let generator = ScrambleGenerator::new(40);
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let scramble = generator.generate(&mut rng);
            for pair in scramble.moves().windows(2) {
                assert_ne!(
                    pair[0].face, pair[1].face,
                    "seed {seed} produced {scramble}"
                );
            }
        }
    }

    #[test]
    fn test_zero_length_is_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        let scramble = ScrambleGenerator::new(0).generate(&mut rng);
        assert!(scramble.is_empty());
        assert_eq!(scramble.to_string(), "");
    }

    #[test]
    fn test_same_seed_reproduces_sequence() {
        let generator = ScrambleGenerator::new(25);
        let a = generator.generate(&mut SmallRng::seed_from_u64(42));
        let b = generator.generate(&mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_tokens_come_from_vocabulary() {
        let vocab: Vec<String> = MOVES.iter().map(|m| m.to_string()).collect();
        assert_eq!(vocab.len(), 18);

        let mut rng = SmallRng::seed_from_u64(3);
        let text = ScrambleGenerator::default().generate(&mut rng).to_string();
        let tokens: Vec<&str> = text.split(' ').collect();
        assert_eq!(tokens.len(), 20);
        for token in tokens {
            assert!(vocab.iter().any(|v| v == token), "unexpected token {token}");
        }
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::new(Face::R, Modifier::Plain).to_string(), "R");
        assert_eq!(Move::new(Face::U, Modifier::Prime).to_string(), "U'");
        assert_eq!(Move::new(Face::F, Modifier::Double).to_string(), "F2");
    }
}
