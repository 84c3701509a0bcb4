use crate::api::ApiError;
use crate::common::types::{
    Account, ChatMessage, ChatRoom, GoalReport, LoginResult, Participation, PaymentInit,
    PointHistory, PointSummary, Product, Promotion, PromotionLiveStatus, Reservation, RoomType,
    Transaction, UserGoal, UserProfile, Winner,
};

/// Events the chat task sends up to the UI.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    Connected,
    Disconnected,
    RoomJoined(ChatRoom),
    RoomLeft { room_id: String },
    /// One page of history, newest-first as the server sends it. `older` is
    /// false for the initial page after a join.
    HistoryLoaded {
        room_id: String,
        page: Vec<ChatMessage>,
        older: bool,
    },
    MessageReceived {
        room_id: String,
        message: ChatMessage,
    },
    Error(String),
}

/// Results of REST fetches spawned by the UI, drained once per frame.
#[derive(Debug)]
pub enum ApiEvent {
    LoggedIn(Result<LoginResult, ApiError>),
    SignedUp(Result<(), ApiError>),
    LoggedOut,
    Profile(Result<UserProfile, ApiError>),

    Rooms {
        room_type: RoomType,
        rooms: Result<Vec<ChatRoom>, ApiError>,
    },
    RoomCreated(Result<ChatRoom, ApiError>),
    Users(Result<Vec<UserProfile>, ApiError>),

    Promotions(Result<Vec<Promotion>, ApiError>),
    PromotionJoined(Result<(), ApiError>),
    Participation(Result<Option<Participation>, ApiError>),
    PromotionMutated(Result<(), ApiError>),
    PromotionStatus(Result<PromotionLiveStatus, ApiError>),
    Winners {
        promotion_name: String,
        winners: Result<Vec<Winner>, ApiError>,
    },
    MonitoringAck(Result<(), ApiError>),

    PointSummary(Result<PointSummary, ApiError>),
    PointHistory(Result<Vec<PointHistory>, ApiError>),

    Products(Result<Vec<Product>, ApiError>),
    MyReservations(Result<Vec<Reservation>, ApiError>),
    AllReservations(Result<Vec<Reservation>, ApiError>),
    PaymentStarted(Result<PaymentInit, ApiError>),
    PaymentConfirmed(Result<(), ApiError>),
    PaymentCancelled(Result<(), ApiError>),

    Goal(Result<Option<UserGoal>, ApiError>),
    GoalSaved(Result<(), ApiError>),
    Reports(Result<Vec<GoalReport>, ApiError>),
    ReportResult(Result<GoalReport, ApiError>),
    ReportDeleted(Result<(), ApiError>),

    Accounts(Result<Vec<Account>, ApiError>),
    Transactions(Result<Vec<Transaction>, ApiError>),
    AccountLinked(Result<(), ApiError>),

    AdvisorApplied(Result<(), ApiError>),
    PendingAdvisors(Result<Vec<UserProfile>, ApiError>),
    AdvisorApproved(Result<(), ApiError>),
}
