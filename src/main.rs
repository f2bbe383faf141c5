use std::io::{self, BufRead, Write};

use chess_rules::board::{to_string, Board, Color, Square, HEIGHT, WIDTH};
use chess_rules::communication_protocol::{parse_action, ServerMsg};
use chess_rules::config::{init_logger, Config, OutputFormat};
use chess_rules::game::{GameOutcome, GameSession, GameStatus};

const ILLEGAL_MOVE: &str = "Illegal move, try again";

fn draw_board(board: &Board) {
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            let square = Square::new(row, col);
            let icon = match board.get(square) {
                Some(p) => {
                    let side = if p.color == Color::White { 'w' } else { 'b' };
                    format!("{}{} ", side, p.kind.letter())
                }
                None if (row + col) % 2 == 1 => "## ".to_string(),
                None => "   ".to_string(),
            };
            print!("{}", icon);
        }
        println!(" {}", HEIGHT - row);
    }
    println!(" a  b  c  d  e  f  g  h");
}

fn present(output: OutputFormat, msg: &ServerMsg, board: &Board) {
    if output == OutputFormat::Json {
        match serde_json::to_string(msg) {
            Ok(line) => println!("{}", line),
            Err(e) => log::error!("Cannot serialize message, error: {}", e),
        }
        return;
    }
    match msg {
        ServerMsg::Board { .. } => draw_board(board),
        ServerMsg::Check { .. } => println!("Check"),
        ServerMsg::IllegalMove { reason } => println!("{}", reason),
        ServerMsg::Checkmate { winner } => println!("Checkmate\n{} wins", winner),
        ServerMsg::Resigned { winner } => println!("{} wins", winner),
        ServerMsg::Draw => {}
    }
}

fn outcome_msg(outcome: GameOutcome) -> ServerMsg {
    match outcome {
        GameOutcome::Checkmate { winner } => ServerMsg::Checkmate { winner },
        GameOutcome::Resignation { winner } => ServerMsg::Resigned { winner },
        GameOutcome::DrawAgreed => ServerMsg::Draw,
    }
}

fn main() {
    init_logger();
    let config = Config::from_env();
    log::debug!("Starting with {:?}", config);

    let mut session = GameSession::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let team = match session.begin_turn() {
            GameStatus::GameOver(outcome) => {
                present(config.output, &outcome_msg(outcome), session.board());
                return;
            }
            GameStatus::AwaitingMove(team) => team,
        };
        let board_msg = ServerMsg::Board {
            board: to_string(session.board()),
            to_move: team,
            move_number: session.current_move_number(),
        };
        present(config.output, &board_msg, session.board());
        if session.in_check() {
            present(config.output, &ServerMsg::Check { color: team }, session.board());
        }

        loop {
            if config.output == OutputFormat::Text {
                print!("{}'s move: ", team);
                if let Err(e) = io::stdout().flush() {
                    log::warn!("Cannot flush stdout, error: {}", e);
                }
            }
            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    log::error!("Cannot read input, error: {}", e);
                    return;
                }
                None => {
                    log::info!("Input closed at move {}", session.current_move_number());
                    return;
                }
            };
            match parse_action(&line).and_then(|action| session.submit(action)) {
                Ok(_) => break,
                Err(e) => {
                    log::debug!("Rejected {:?}: {}", line, e);
                    let msg = ServerMsg::IllegalMove { reason: ILLEGAL_MOVE.to_string() };
                    present(config.output, &msg, session.board());
                }
            }
        }
    }
}
