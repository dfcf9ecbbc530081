#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};

    use crate::{Algorithm, Board, Piece, SearchConfig, Searcher, WIN_SCORE};

    /// Positions reached by alternating moves, human first
    const POSITIONS: [&str; 7] = ["", "4", "4453", "17273", "334455", "1234567", "4444332"];

    const SEARCHING: [Algorithm; 3] = [
        Algorithm::Minimax,
        Algorithm::AlphaBeta,
        Algorithm::AlphaBetaCutoff,
    ];

    fn search(board: &Board, config: SearchConfig) -> Result<crate::SearchResult> {
        Ok(Searcher::with_seed(9).choose_move(board, &config)?)
    }

    #[test]
    pub fn empty_board_opens_in_the_centre() -> Result<()> {
        let board: Board = Board::new();
        let result = search(&board, SearchConfig::new(Algorithm::Minimax, 4))?;

        assert_eq!(result.column, Some(3));
        Ok(())
    }

    #[test]
    pub fn blocks_an_open_three() -> Result<()> {
        // human on the bottom row in columns 1-3, the AI stacked in column 7
        let board: Board = Board::from_moves("17273", Piece::Human)?;

        for &algorithm in SEARCHING.iter() {
            for depth in 1..=4 {
                let result = search(&board, SearchConfig::new(algorithm, depth))?;
                assert_eq!(
                    result.column,
                    Some(3),
                    "{} at depth {} did not block",
                    algorithm,
                    depth
                );
            }
        }
        Ok(())
    }

    #[test]
    pub fn takes_an_immediate_win() -> Result<()> {
        let board: Board = Board::from_moves("17273", Piece::Ai)?;

        for &algorithm in SEARCHING.iter() {
            for depth in 1..=4 {
                let result = search(&board, SearchConfig::new(algorithm, depth))?;
                assert_eq!(result.column, Some(3));
                assert_eq!(result.score, WIN_SCORE);
            }
        }
        Ok(())
    }

    #[test]
    pub fn alpha_beta_preserves_minimax_value() -> Result<()> {
        for moves in POSITIONS.iter() {
            let board: Board = Board::from_moves(moves, Piece::Human)?;
            for depth in 1..=4 {
                let minimax = search(&board, SearchConfig::new(Algorithm::Minimax, depth))?;
                let alpha_beta = search(&board, SearchConfig::new(Algorithm::AlphaBeta, depth))?;

                assert_eq!(
                    alpha_beta.score, minimax.score,
                    "score mismatch for '{}' at depth {}",
                    moves, depth
                );
                assert_eq!(alpha_beta.column, minimax.column);
                assert!(alpha_beta.nodes_visited <= minimax.nodes_visited);
            }
        }
        Ok(())
    }

    #[test]
    pub fn alpha_beta_prunes() -> Result<()> {
        let board: Board = Board::new();
        let minimax = search(&board, SearchConfig::new(Algorithm::Minimax, 4))?;
        let alpha_beta = search(&board, SearchConfig::new(Algorithm::AlphaBeta, 4))?;

        assert_eq!(minimax.nodes_visited, 1 + 7 + 49 + 343 + 2401);
        assert!(alpha_beta.nodes_visited < minimax.nodes_visited);
        Ok(())
    }

    #[test]
    pub fn cutoff_matches_alpha_beta() -> Result<()> {
        for moves in POSITIONS.iter() {
            let board: Board = Board::from_moves(moves, Piece::Human)?;
            for depth in 1..=5 {
                let alpha_beta = search(&board, SearchConfig::new(Algorithm::AlphaBeta, depth))?;
                let cutoff = search(&board, SearchConfig::cutoff(depth))?;

                assert_eq!(cutoff.column, alpha_beta.column);
                assert_eq!(cutoff.score, alpha_beta.score);
                assert_eq!(cutoff.nodes_visited, alpha_beta.nodes_visited);
            }
        }
        Ok(())
    }

    #[test]
    pub fn deterministic_across_seeds() -> Result<()> {
        let board: Board = Board::from_moves("4453", Piece::Human)?;

        for &algorithm in SEARCHING.iter() {
            let config = SearchConfig::new(algorithm, 3);
            let first = Searcher::with_seed(1).choose_move(&board, &config)?;
            let second = Searcher::with_seed(2).choose_move(&board, &config)?;
            let reused = {
                let mut searcher = Searcher::new();
                searcher.choose_move(&board, &config)?;
                searcher.choose_move(&board, &config)?
            };

            for other in [second, reused].iter() {
                assert_eq!(first.column, other.column);
                assert_eq!(first.score, other.score);
                // the counter starts from zero on every call
                assert_eq!(first.nodes_visited, other.nodes_visited);
            }
        }
        Ok(())
    }

    #[test]
    pub fn search_never_mutates_the_board() -> Result<()> {
        let board: Board = Board::from_moves("4453", Piece::Human)?;
        let before = board;
        let mut searcher = Searcher::with_seed(4);

        for &algorithm in Algorithm::ALL.iter() {
            searcher.choose_move(&board, &SearchConfig::new(algorithm, 3))?;
            assert_eq!(board, before);
        }
        Ok(())
    }

    #[test]
    pub fn searches_other_board_sizes() -> Result<()> {
        // a 5x5 board with the AI one move from a vertical win in column 3
        let board = Board::<5, 5>::from_moves("313231", Piece::Ai)?;
        let column = search_small(&board)?
            .column
            .ok_or_else(|| anyhow!("no move returned"))?;

        assert_eq!(column, 2);
        Ok(())
    }

    fn search_small(board: &Board<5, 5>) -> Result<crate::SearchResult> {
        Ok(Searcher::with_seed(0).choose_move(board, &SearchConfig::new(Algorithm::AlphaBeta, 3))?)
    }
}
