use alloy::{primitives::B256, sol, sol_types::SolEvent};

sol! {
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}

/// `keccak256("Transfer(address,address,uint256)")`, the first topic of every transfer log.
pub const TRANSFER_TOPIC: B256 = IERC20::Transfer::SIGNATURE_HASH;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_topic() {
        assert_eq!(
            TRANSFER_TOPIC.to_string(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
