//! Flattening of portfolio tokens into underlying swap tokens
//!
//! Rebalancing swaps operate on underlying ERC-20 tokens. A position wrapper
//! expands into its token0 and token1; the index tables map each underlying
//! entry back to the portfolio token it came from.

use serde::{Deserialize, Serialize};
use types::{AllocationError, AssetId};

/// One entry of the portfolio's token list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioToken {
    Token(AssetId),
    PositionWrapper {
        wrapper: AssetId,
        token0: AssetId,
        token1: AssetId,
    },
}

impl PortfolioToken {
    pub fn id(&self) -> &AssetId {
        match self {
            PortfolioToken::Token(id) => id,
            PortfolioToken::PositionWrapper { wrapper, .. } => wrapper,
        }
    }
}

/// Underlying token list with the index tables used to build swap data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderlyingLayout {
    /// Underlying tokens in portfolio order, wrappers expanded in place
    pub underlying_tokens: Vec<AssetId>,
    /// For each underlying token, the portfolio token index it belongs to
    pub portfolio_token_index: Vec<usize>,
    /// For each underlying token, whether it comes from a position wrapper
    pub is_external_position: Vec<bool>,
    /// For each portfolio token, whether it is a position wrapper
    pub is_token_external_position: Vec<bool>,
    /// Portfolio indices of the position wrappers
    pub position_wrapper_index: Vec<usize>,
    /// Underlying index of each wrapper's token0
    pub index0: Vec<usize>,
    /// Underlying index of each wrapper's token1
    pub index1: Vec<usize>,
}

impl UnderlyingLayout {
    pub fn build(tokens: &[PortfolioToken]) -> Result<Self, AllocationError> {
        if tokens.is_empty() {
            return Err(AllocationError::EmptyInput);
        }

        let mut layout = UnderlyingLayout::default();
        for (portfolio_index, token) in tokens.iter().enumerate() {
            match token {
                PortfolioToken::Token(id) => {
                    layout.push_underlying(id.clone(), portfolio_index, false);
                    layout.is_token_external_position.push(false);
                }
                PortfolioToken::PositionWrapper { token0, token1, .. } => {
                    layout.index0.push(layout.underlying_tokens.len());
                    layout.push_underlying(token0.clone(), portfolio_index, true);
                    layout.index1.push(layout.underlying_tokens.len());
                    layout.push_underlying(token1.clone(), portfolio_index, true);
                    layout.is_token_external_position.push(true);
                    layout.position_wrapper_index.push(portfolio_index);
                }
            }
        }
        Ok(layout)
    }

    pub fn wrapper_count(&self) -> usize {
        self.position_wrapper_index.len()
    }

    fn push_underlying(&mut self, token: AssetId, portfolio_index: usize, external: bool) {
        self.underlying_tokens.push(token);
        self.portfolio_token_index.push(portfolio_index);
        self.is_external_position.push(external);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(id: &str) -> PortfolioToken {
        PortfolioToken::Token(AssetId::from(id))
    }

    fn wrapper(id: &str, token0: &str, token1: &str) -> PortfolioToken {
        PortfolioToken::PositionWrapper {
            wrapper: AssetId::from(id),
            token0: AssetId::from(token0),
            token1: AssetId::from(token1),
        }
    }

    #[test]
    fn test_single_wrapper_layout() {
        let tokens = vec![
            token("USDC"),
            wrapper("PW2", "USDT", "WETH"),
            token("DAI"),
            token("WBTC"),
            token("USDT"),
        ];
        let layout = UnderlyingLayout::build(&tokens).unwrap();

        let ids: Vec<&str> = layout.underlying_tokens.iter().map(AssetId::as_str).collect();
        assert_eq!(ids, vec!["USDC", "USDT", "WETH", "DAI", "WBTC", "USDT"]);
        assert_eq!(layout.portfolio_token_index, vec![0, 1, 1, 2, 3, 4]);
        assert_eq!(
            layout.is_external_position,
            vec![false, true, true, false, false, false]
        );
        assert_eq!(
            layout.is_token_external_position,
            vec![false, true, false, false, false]
        );
        assert_eq!(layout.position_wrapper_index, vec![1]);
        assert_eq!(layout.index0, vec![1]);
        assert_eq!(layout.index1, vec![2]);
    }

    #[test]
    fn test_multiple_wrappers() {
        let tokens = vec![
            wrapper("PW1", "A", "B"),
            token("C"),
            wrapper("PW2", "D", "E"),
        ];
        let layout = UnderlyingLayout::build(&tokens).unwrap();

        assert_eq!(layout.wrapper_count(), 2);
        assert_eq!(layout.position_wrapper_index, vec![0, 2]);
        assert_eq!(layout.index0, vec![0, 3]);
        assert_eq!(layout.index1, vec![1, 4]);
        assert_eq!(layout.portfolio_token_index, vec![0, 0, 1, 2, 2]);
        assert_eq!(tokens[2].id().as_str(), "PW2");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(UnderlyingLayout::build(&[]), Err(AllocationError::EmptyInput));
    }
}
