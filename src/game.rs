use crate::board::{new_board, Board, Color, PieceType};
use crate::check::{has_legal_move, is_in_check};
use crate::communication_protocol::{Action, MoveRequest};
use crate::error::{ChessError, ChessResult};
use crate::moves::{attempt_move_to, promote, will_be_promoted, MoveKind};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Resignation { winner: Color },
    DrawAgreed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    AwaitingMove(Color),
    GameOver(GameOutcome),
}

/// One game: the board plus the turn counter and the draw offers of both sides.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    current_move_number: u32,
    white_offering: bool,
    black_offering: bool,
    status: GameStatus,
    /// Whether the side to move is in check, once its turn has been entered.
    turn_entry: Option<bool>,
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        GameSession::from_board(new_board())
    }

    /// Starts a game from an arbitrary position with White to move.
    pub fn from_board(board: Board) -> Self {
        GameSession {
            board,
            current_move_number: 1,
            white_offering: false,
            black_offering: false,
            status: GameStatus::AwaitingMove(Color::White),
            turn_entry: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_move_number(&self) -> u32 {
        self.current_move_number
    }

    pub fn to_move(&self) -> Color {
        Color::to_move(self.current_move_number)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_offering_draw(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_offering,
            Color::Black => self.black_offering,
        }
    }

    /// Valid after [`GameSession::begin_turn`].
    pub fn in_check(&self) -> bool {
        self.turn_entry == Some(true)
    }

    /// Evaluates the position for the side to move: ends the game on checkmate,
    /// otherwise remembers whether that side is in check. Repeated calls are cheap.
    pub fn begin_turn(&mut self) -> GameStatus {
        if matches!(self.status, GameStatus::GameOver(_)) || self.turn_entry.is_some() {
            return self.status;
        }
        let team = self.to_move();
        let check = is_in_check(&self.board, team);
        if check && !has_legal_move(&self.board, team, self.current_move_number) {
            self.finish(GameOutcome::Checkmate { winner: team.opposite() });
        }
        else {
            if check {
                log::debug!("{} is in check", team);
            }
            self.turn_entry = Some(check);
            self.status = GameStatus::AwaitingMove(team);
        }
        self.status
    }

    /// Applies one action of the side to move. A rejected action changes nothing.
    pub fn submit(&mut self, action: Action) -> ChessResult<GameStatus> {
        if let GameStatus::GameOver(_) = self.begin_turn() {
            return Err(ChessError::GameOver);
        }
        let team = self.to_move();
        match action {
            Action::Resign => {
                self.finish(GameOutcome::Resignation { winner: team.opposite() });
                Ok(self.status)
            }
            Action::AcceptDraw => {
                if !self.is_offering_draw(team.opposite()) {
                    return Err(ChessError::NoDrawOffer);
                }
                self.finish(GameOutcome::DrawAgreed);
                Ok(self.status)
            }
            Action::Move(request) => {
                self.play(team, request)?;
                Ok(self.begin_turn())
            }
        }
    }

    fn play(&mut self, team: Color, request: MoveRequest) -> ChessResult<MoveKind> {
        if self.is_offering_draw(team.opposite()) {
            return Err(ChessError::DrawOfferPending(team));
        }
        if !request.from.on_board() {
            return Err(ChessError::IllegalMove { from: request.from, to: request.to });
        }
        let id = self.board.id_at(request.from).ok_or(ChessError::NoPieceAt(request.from))?;
        let piece = *self.board.piece(id);
        if piece.color != team {
            return Err(ChessError::WrongTeam { square: request.from, owner: piece.color });
        }

        let promotes = piece.kind == PieceType::Pawn && will_be_promoted(team, request.to.row);
        let promotion = match (promotes, request.promotion) {
            (false, Some(_)) => return Err(ChessError::PromotionNotApplicable),
            (false, None) => None,
            (true, Some(kind)) if !kind.is_promotion_target() => return Err(ChessError::InvalidPromotion(kind)),
            (true, kind) => Some(kind.unwrap_or(PieceType::Queen)),
        };

        let kind = attempt_move_to(&mut self.board, id, request.to, self.current_move_number)?;
        if let Some(promotion) = promotion {
            promote(&mut self.board, id, promotion)?;
        }
        if request.offer_draw {
            log::debug!("{} offers a draw", team);
            match team {
                Color::White => self.white_offering = true,
                Color::Black => self.black_offering = true,
            }
        }
        log::debug!("Move {}: {} {} -> {} ({:?})", self.current_move_number, team, request.from, request.to, kind);

        self.current_move_number += 1;
        self.turn_entry = None;
        Ok(kind)
    }

    fn finish(&mut self, outcome: GameOutcome) {
        log::info!("Game over after move {}: {:?}", self.current_move_number, outcome);
        self.status = GameStatus::GameOver(outcome);
    }
}
