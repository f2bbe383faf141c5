use crate::board::{Color, PieceType, Square, HEIGHT};
use crate::error::{ChessError, ChessResult};

const DRAW_OFFER: &str = "draw?";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
    pub offer_draw: bool,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self {
        MoveRequest { from, to, promotion: None, offer_draw: false }
    }
}

/// One half-move worth of input from the side to move.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Move(MoveRequest),
    Resign,
    /// Accepts the opponent's pending draw offer.
    AcceptDraw,
}

/// Parses `e4`-style tokens; rank 8 is row 0, file `a` is column 0.
pub fn parse_square(token: &str) -> ChessResult<Square> {
    let malformed = || ChessError::MalformedInput(format!("bad square {:?}", token));
    let bytes = token.as_bytes();
    if bytes.len() != 2 {
        return Err(malformed());
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(malformed());
    }
    let col = (file - b'a') as usize;
    let row = HEIGHT - (rank - b'0') as usize;
    Ok(Square::new(row, col))
}

fn parse_promotion(token: &str) -> ChessResult<PieceType> {
    PieceType::from_promotion_letter(token)
        .ok_or_else(|| ChessError::MalformedInput(format!("bad promotion piece {:?}", token)))
}

/// Accepted forms:
/// `resign`, `draw`, `e2 e4`, `e7 e8 N`, `e2 e4 draw?`, `e7 e8 N draw?`.
pub fn parse_action(input: &str) -> ChessResult<Action> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    match tokens.as_slice() {
        ["resign"] => Ok(Action::Resign),
        ["draw"] => Ok(Action::AcceptDraw),
        [from, to, rest @ ..] if rest.len() <= 2 => {
            let mut request = MoveRequest::new(parse_square(from)?, parse_square(to)?);
            match rest {
                [] => {}
                [extra] if *extra == DRAW_OFFER => request.offer_draw = true,
                [letter] => request.promotion = Some(parse_promotion(letter)?),
                [letter, offer] if *offer == DRAW_OFFER => {
                    request.promotion = Some(parse_promotion(letter)?);
                    request.offer_draw = true;
                }
                _ => return Err(ChessError::MalformedInput(format!("unexpected {:?}", rest.join(" ")))),
            }
            Ok(Action::Move(request))
        }
        _ => Err(ChessError::MalformedInput(format!("cannot read {:?}", input.trim()))),
    }
}

/// Events handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "msg_type")]
pub enum ServerMsg {
    Board { board: String, to_move: Color, move_number: u32 },
    Check { color: Color },
    IllegalMove { reason: String },
    Checkmate { winner: Color },
    Resigned { winner: Color },
    Draw,
}

#[cfg(test)]
mod test {
    use crate::board::{Color, PieceType, Square};
    use crate::communication_protocol::{parse_action, parse_square, Action, MoveRequest, ServerMsg};
    use crate::error::ChessError;

    #[test]
    fn test_parse_square() {
        assert_eq!(parse_square("a8"), Ok(Square::new(0, 0)));
        assert_eq!(parse_square("e2"), Ok(Square::new(6, 4)));
        assert_eq!(parse_square("h1"), Ok(Square::new(7, 7)));
        for bad in ["", "e", "e9", "e0", "i4", "E4", "e44", "4e"] {
            assert!(matches!(parse_square(bad), Err(ChessError::MalformedInput(_))), "{bad}");
        }
    }

    #[test]
    fn test_parse_plain_move() {
        let action = parse_action("e2 e4").unwrap();
        assert_eq!(action, Action::Move(MoveRequest::new(Square::new(6, 4), Square::new(4, 4))));
    }

    #[test]
    fn test_parse_extras() {
        let Action::Move(request) = parse_action("g7 g8 N").unwrap() else { panic!("not a move") };
        assert_eq!((request.promotion, request.offer_draw), (Some(PieceType::Knight), false));

        let Action::Move(request) = parse_action("e2 e4 draw?").unwrap() else { panic!("not a move") };
        assert_eq!((request.promotion, request.offer_draw), (None, true));

        let Action::Move(request) = parse_action("a2 a1 R draw?").unwrap() else { panic!("not a move") };
        assert_eq!((request.promotion, request.offer_draw), (Some(PieceType::Rook), true));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_action("resign"), Ok(Action::Resign));
        assert_eq!(parse_action("draw"), Ok(Action::AcceptDraw));
    }

    #[test]
    fn test_malformed_input_rejected() {
        for bad in ["", "e2", "resign now", "draw?", "e2 e9", "e2 e4 K", "e2 e4 Q Q", "e2 e4 draw? Q", "e2 e4 Q draw? x", "e7 e8 queen"] {
            assert!(matches!(parse_action(bad), Err(ChessError::MalformedInput(_))), "{bad}");
        }
    }

    #[test]
    fn test_server_msg_json() {
        let msg = ServerMsg::Checkmate { winner: Color::Black };
        assert_eq!(serde_json::to_string(&msg).unwrap(), r#"{"msg_type":"Checkmate","winner":"Black"}"#);
        assert_eq!(serde_json::to_string(&ServerMsg::Draw).unwrap(), r#"{"msg_type":"Draw"}"#);
    }
}
