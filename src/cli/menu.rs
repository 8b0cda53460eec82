//! The interactive menu as a finite set of screens with declared transitions.
//!
//! Nothing here touches the terminal; the session loop asks the current
//! screen for its entries, shows them, and follows the chosen transition.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Status,
    RuleManagement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Initialize,
    AddRule,
    DeleteRule,
    ShowStatus,
    Enable,
    Disable,
    Reload,
    ImportRules,
    ExportRules,
    OrganizeRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Perform `action`, then show `then` whatever the outcome.
    Run { action: MenuAction, then: Screen },
    Goto(Screen),
    Exit,
}

#[derive(Debug, Clone, Copy)]
pub struct MenuEntry {
    pub label: &'static str,
    pub transition: Transition,
}

const fn run(label: &'static str, action: MenuAction, then: Screen) -> MenuEntry {
    MenuEntry {
        label,
        transition: Transition::Run { action, then },
    }
}

const fn goto(label: &'static str, screen: Screen) -> MenuEntry {
    MenuEntry {
        label,
        transition: Transition::Goto(screen),
    }
}

const MAIN_ENTRIES: &[MenuEntry] = &[
    run("One-step initialization", MenuAction::Initialize, Screen::Main),
    run("Add rule", MenuAction::AddRule, Screen::Main),
    run("Delete rule", MenuAction::DeleteRule, Screen::Main),
    goto("Rule management", Screen::RuleManagement),
    run("Status and rules", MenuAction::ShowStatus, Screen::Status),
    MenuEntry {
        label: "Exit",
        transition: Transition::Exit,
    },
];

const STATUS_ENTRIES: &[MenuEntry] = &[
    run("Enable firewall", MenuAction::Enable, Screen::Main),
    run("Disable firewall", MenuAction::Disable, Screen::Main),
    run("Reload firewall", MenuAction::Reload, Screen::Main),
    goto("Back to main menu", Screen::Main),
];

const RULE_MANAGEMENT_ENTRIES: &[MenuEntry] = &[
    run("Import rules", MenuAction::ImportRules, Screen::RuleManagement),
    run("Export rules", MenuAction::ExportRules, Screen::RuleManagement),
    run("Organize rules", MenuAction::OrganizeRules, Screen::RuleManagement),
    goto("Back to main menu", Screen::Main),
];

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Main => "UFW Manager",
            Screen::Status => "Firewall actions",
            Screen::RuleManagement => "Rule management",
        }
    }

    pub fn entries(&self) -> &'static [MenuEntry] {
        match self {
            Screen::Main => MAIN_ENTRIES,
            Screen::Status => STATUS_ENTRIES,
            Screen::RuleManagement => RULE_MANAGEMENT_ENTRIES,
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries().iter().map(|e| e.label).collect()
    }

    /// Transition for the entry at `index`, `None` if there is no such entry.
    pub fn select(&self, index: usize) -> Option<Transition> {
        self.entries().get(index).map(|e| e.transition)
    }

    /// Escape or interrupt: sub-screens go back to the main menu, the main menu exits.
    pub fn on_cancel(&self) -> Transition {
        match self {
            Screen::Main => Transition::Exit,
            _ => Transition::Goto(Screen::Main),
        }
    }
}
