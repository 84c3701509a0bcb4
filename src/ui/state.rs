use std::collections::HashMap;
use std::time::Instant;

use crate::chat::RoomSession;
use crate::common::types::{
    Account, ChatRoom, GoalReport, Participation, PointHistory, PointSummary, Product, Promotion,
    PromotionLiveStatus, Reservation, RoomType, Transaction, UserGoal, UserProfile,
};
use crate::storage::StoredSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Chat,
    Promotions,
    Points,
    Products,
    Goals,
    Accounts,
    Admin,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Sign in",
            View::Chat => "Chat",
            View::Promotions => "Promotions",
            View::Points => "Points",
            View::Products => "Consultations",
            View::Goals => "Goals",
            View::Accounts => "Accounts",
            View::Admin => "Admin",
        }
    }
}

/// Everything the UI thread mutates between frames.
pub struct AppState {
    pub view: View,
    pub session_user: Option<StoredSession>,
    /// STOMP socket state, as last reported by the chat task.
    pub connected: bool,
    pub status_line: Option<String>,

    pub login: LoginState,
    pub chat: ChatState,
    pub promotions: PromotionsState,
    pub points: PointsState,
    pub products: ProductsState,
    pub goals: GoalsState,
    pub accounts: AccountsState,
    pub admin: AdminState,
}

impl AppState {
    pub fn new(session_user: Option<StoredSession>) -> Self {
        let view = if session_user.is_some() {
            View::Chat
        } else {
            View::Login
        };
        Self {
            view,
            session_user,
            connected: false,
            status_line: None,
            login: LoginState::default(),
            chat: ChatState::default(),
            promotions: PromotionsState::default(),
            points: PointsState::default(),
            products: ProductsState::default(),
            goals: GoalsState::default(),
            accounts: AccountsState::default(),
            admin: AdminState::default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.session_user
            .as_ref()
            .is_some_and(|s| s.role == "ADMIN")
    }

    pub fn is_advisor(&self) -> bool {
        self.session_user
            .as_ref()
            .is_some_and(|s| s.role == "ADVISOR")
    }

    /// Drops all per-user state and returns to the login screen.
    pub fn reset_to_login(&mut self) {
        *self = Self::new(None);
    }
}

#[derive(Default)]
pub struct LoginState {
    pub user_name: String,
    pub password: String,
    pub name: String,
    pub signup_mode: bool,
    pub busy: bool,
    pub error: Option<String>,
}

pub struct ChatState {
    pub session: RoomSession,
    pub rooms: Vec<ChatRoom>,
    pub rooms_loading: bool,
    pub active_tab: RoomType,
    pub input_text: String,
    /// Cached last-message previews, keyed by room id.
    pub previews: HashMap<String, String>,
    pub new_group_title: String,
    pub show_new_room: bool,
    /// User directory for starting direct chats.
    pub users: Vec<UserProfile>,
    /// Set on join; the local ENTER banner is appended once the initial
    /// history page has landed.
    pub pending_enter_notice: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            session: RoomSession::new(),
            rooms: Vec::new(),
            rooms_loading: false,
            active_tab: RoomType::Group,
            input_text: String::new(),
            previews: HashMap::new(),
            new_group_title: String::new(),
            show_new_room: false,
            users: Vec::new(),
            pending_enter_notice: false,
        }
    }
}

impl ChatState {
    pub fn preview_for<'a>(&'a self, room: &'a ChatRoom) -> Option<&'a str> {
        self.previews
            .get(&room.id)
            .map(String::as_str)
            .or(room.last_message.as_deref())
    }
}

#[derive(Default)]
pub struct PromotionsState {
    pub promotions: Vec<Promotion>,
    pub loading: bool,
    pub participation: Option<Participation>,
    pub notice: Option<String>,
}

#[derive(Default)]
pub struct PointsState {
    pub summary: Option<PointSummary>,
    pub history: Vec<PointHistory>,
}

#[derive(Default)]
pub struct ProductsState {
    pub products: Vec<Product>,
    pub my_reservations: Vec<Reservation>,
    /// Order awaiting confirmation; the payment key comes from the hosted
    /// checkout page.
    pub pending_payment: Option<crate::common::types::PaymentInit>,
    pub payment_key_input: String,
    pub new_name: String,
    pub new_price: String,
    pub new_description: String,
}

#[derive(Default)]
pub struct GoalsState {
    pub goal: UserGoal,
    pub goal_exists: bool,
    pub reports: Vec<GoalReport>,
    pub question: String,
    pub open_report: Option<GoalReport>,
    pub analyzing: bool,
}

#[derive(Default)]
pub struct AccountsState {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub organization: String,
    pub bank_id: String,
}

#[derive(Default)]
pub struct NewPromotionForm {
    pub name: String,
    pub point_amount: String,
    pub total_stock: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Default)]
pub struct AdminState {
    pub pending_advisors: Vec<UserProfile>,
    pub all_reservations: Vec<Reservation>,
    /// Promotion picked for live monitoring; polled on an interval while the
    /// view is open.
    pub monitored_promotion: Option<String>,
    pub live_status: Option<PromotionLiveStatus>,
    pub winners: Vec<crate::common::types::Winner>,
    pub winners_of: Option<String>,
    pub last_poll: Option<Instant>,
    pub new_promotion: NewPromotionForm,
}
