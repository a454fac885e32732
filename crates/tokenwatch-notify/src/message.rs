//! Rendering a [`DomainEvent`] as a Telegram message (legacy Markdown).

use tokenwatch_core::event::DomainEvent;

/// Default block explorer for token links.
pub const DEFAULT_EXPLORER_URL: &str = "https://etherscan.io";

/// Render the notification text for `event`.
pub fn format_message(event: &DomainEvent, explorer_url: &str) -> String {
    let explorer = explorer_url.trim_end_matches('/');
    format!(
        "New ETH Token Created:\n\
         Name: {name}\n\
         Symbol: {symbol}\n\
         Total Supply: {supply}\n\
         Address: [{addr}]({explorer}/address/{addr})",
        name = escape_markdown(&event.name),
        symbol = escape_markdown(&event.symbol),
        supply = event.total_supply,
        addr = event.token_address,
    )
}

/// Escape the characters legacy Markdown treats as entity delimiters.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use tokenwatch_core::event::LogPosition;

    fn event(name: &str, symbol: &str) -> DomainEvent {
        DomainEvent {
            token_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".into(),
            name: name.into(),
            symbol: symbol.into(),
            total_supply: U256::from(1_000_000_000_000_000_000_000u128),
            position: LogPosition {
                block_number: 4_200_000,
                tx_hash: "0xabc".into(),
                log_index: 0,
            },
        }
    }

    #[test]
    fn renders_template() {
        let text = format_message(&event("Foo", "FOO"), DEFAULT_EXPLORER_URL);
        assert_eq!(
            text,
            "New ETH Token Created:\n\
             Name: Foo\n\
             Symbol: FOO\n\
             Total Supply: 1000000000000000000000\n\
             Address: [0x5FbDB2315678afecb367f032d93F642f64180aa3](https://etherscan.io/address/0x5FbDB2315678afecb367f032d93F642f64180aa3)"
        );
    }

    #[test]
    fn escapes_user_controlled_fields() {
        let text = format_message(&event("my_*token*", "[X]`"), DEFAULT_EXPLORER_URL);
        assert!(text.contains("Name: my\\_\\*token\\*\n"));
        assert!(text.contains("Symbol: \\[X]\\`\n"));
    }

    #[test]
    fn trims_trailing_slash_on_explorer() {
        let text = format_message(&event("A", "A"), "https://basescan.org/");
        assert!(text.ends_with("(https://basescan.org/address/0x5FbDB2315678afecb367f032d93F642f64180aa3)"));
    }
}
