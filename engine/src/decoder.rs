use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use bigdecimal::BigDecimal;
use holders_common::{
    erc20::TRANSFER_TOPIC,
    log::{RawLog, TransferLog},
    quantity::parse_quantity,
    text_truncate::truncate_for_display,
    transfer::TransferEvent,
};

use crate::DecodeError;

/// `raw × 10^(-decimals)`, exactly.
pub fn scale_amount(raw: U256, decimals: u8) -> Result<BigDecimal, DecodeError> {
    BigDecimal::from_str(&format!("{raw}e-{decimals}")).map_err(|_| DecodeError::InvalidAmount {
        raw: raw.to_string(),
        decimals,
    })
}

fn parse_topic(log: &RawLog, position: usize) -> Result<B256, DecodeError> {
    let value = &log.topics[position];
    B256::from_str(value).map_err(|_| DecodeError::InvalidTopic {
        position,
        value: truncate_for_display(value, 66),
    })
}

/// Hex digits of any length up to 64, so an odd count such as `0x1` is accepted.
fn parse_amount(data: &str) -> Result<U256, DecodeError> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    if digits.is_empty() {
        return Err(DecodeError::EmptyData);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidData(truncate_for_display(data, 66)));
    }
    if digits.len() > 64 {
        return Err(DecodeError::DataTooLong(digits.len().div_ceil(2)));
    }
    U256::from_str_radix(digits, 16).map_err(|_| DecodeError::InvalidData(truncate_for_display(data, 66)))
}

/// Decodes one `Transfer(address,address,uint256)` log. Addresses come from the
/// low 20 bytes of topics 1 and 2.
pub fn decode_log(log: &RawLog, decimals: u8) -> Result<TransferEvent, DecodeError> {
    if log.topics.len() != 3 {
        return Err(DecodeError::TopicCount(log.topics.len()));
    }

    let signature = parse_topic(log, 0)?;
    if signature != TRANSFER_TOPIC {
        return Err(DecodeError::NotTransfer(signature.to_string()));
    }
    let from = Address::from_word(parse_topic(log, 1)?);
    let to = Address::from_word(parse_topic(log, 2)?);

    let block_height = parse_quantity(&log.block_number)
        .ok_or_else(|| DecodeError::InvalidBlockNumber(log.block_number.clone()))?;
    let amount = scale_amount(parse_amount(&log.data)?, decimals)?;

    Ok(TransferEvent {
        block_height,
        from,
        to,
        amount,
    })
}

/// Decodes every log, keeping the raw fields next to the decoded ones. The
/// first malformed log aborts the whole batch.
pub fn decode_logs(logs: Vec<RawLog>, decimals: u8) -> crate::Result<Vec<TransferLog>> {
    logs.into_iter()
        .enumerate()
        .map(|(index, log)| {
            let event = decode_log(&log, decimals)
                .map_err(|source| crate::Error::Decode { index, source })?;
            Ok(TransferLog {
                log,
                from: event.from,
                to: event.to,
                amount: event.amount,
            })
        })
        .collect()
}
