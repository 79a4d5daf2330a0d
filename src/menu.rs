//! Menu options and the continuation prompt.

/// The six menu options, selected by letter (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Withdraw,
    Deposit,
    BalanceInquiry,
    Transfer,
    ChangePin,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 6] = [
        MenuOption::Withdraw,
        MenuOption::Deposit,
        MenuOption::BalanceInquiry,
        MenuOption::Transfer,
        MenuOption::ChangePin,
        MenuOption::Exit,
    ];

    /// Maps a typed letter to an option. Returns `None` for anything else.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(MenuOption::Withdraw),
            'B' => Some(MenuOption::Deposit),
            'C' => Some(MenuOption::BalanceInquiry),
            'D' => Some(MenuOption::Transfer),
            'E' => Some(MenuOption::ChangePin),
            'F' => Some(MenuOption::Exit),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            MenuOption::Withdraw => 'A',
            MenuOption::Deposit => 'B',
            MenuOption::BalanceInquiry => 'C',
            MenuOption::Transfer => 'D',
            MenuOption::ChangePin => 'E',
            MenuOption::Exit => 'F',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::Withdraw => "Withdraw",
            MenuOption::Deposit => "Deposit",
            MenuOption::BalanceInquiry => "Balance Inquiry",
            MenuOption::Transfer => "Transfer Funds",
            MenuOption::ChangePin => "Change PIN",
            MenuOption::Exit => "EXIT",
        }
    }
}

/// Answer to "continue (C) or exit (E)?".
///
/// Only `E`/`e` ends the session; every other answer continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    Continue,
    Exit,
}

impl Continuation {
    pub fn from_letter(letter: char) -> Self {
        if letter.eq_ignore_ascii_case(&'E') {
            Continuation::Exit
        } else {
            Continuation::Continue
        }
    }
}

/// Renders the menu, one `<letter>. <label>` line per option.
pub fn render() -> String {
    MenuOption::ALL
        .iter()
        .map(|option| format!("{}. {}\n", option.letter(), option.label()))
        .collect()
}
