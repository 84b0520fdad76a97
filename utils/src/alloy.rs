use alloy::primitives::Address;

pub trait StringExt {
    fn parse_as_address(&self) -> crate::Result<Address>;
}

impl StringExt for str {
    fn parse_as_address(&self) -> crate::Result<Address> {
        self.trim()
            .parse::<Address>()
            .map_err(|_| crate::Error::InvalidAddress(self.to_string()))
    }
}

impl StringExt for String {
    fn parse_as_address(&self) -> crate::Result<Address> {
        self.as_str().parse_as_address()
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn test_parse_as_address() {
        assert_eq!(
            "0x9f8f72aa9304c8b593d555f12ef6589cc3a579a2"
                .parse_as_address()
                .unwrap(),
            address!("0x9f8f72aa9304c8b593d555f12ef6589cc3a579a2")
        );
        assert!(matches!(
            "0x9f8f72aa".parse_as_address(),
            Err(crate::Error::InvalidAddress(s)) if s == "0x9f8f72aa"
        ));
        assert!("MKR".to_string().parse_as_address().is_err());
    }
}
