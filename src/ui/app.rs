use std::future::Future;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::api::{ApiClient, CreatePromotionRequest, CreateRoomRequest, PromotionAction};
use crate::common::types::RoomType;
use crate::common::{ApiEvent, ChatCommand, ChatEvent};
use crate::storage::{LocalStore, StoredSession};

use super::state::{AppState, View};
use super::views::accounts::AccountsAction;
use super::views::admin::AdminAction;
use super::views::chat::ChatAction;
use super::views::goals::GoalsAction;
use super::views::login::LoginAction;
use super::views::points::PointsAction;
use super::views::products::ProductsAction;
use super::views::promotions::PromotionsAction;
use super::views::{accounts, admin, chat, goals, login, points, products, promotions};
use super::components::room_list::{self, RoomListAction};

const ADMIN_POLL_INTERVAL: Duration = Duration::from_secs(3);

pub struct FinanceApp {
    state: AppState,
    api: ApiClient,
    store: LocalStore,
    rt: tokio::runtime::Handle,
    cmd_tx: mpsc::Sender<ChatCommand>,
    chat_rx: mpsc::Receiver<ChatEvent>,
    api_tx: mpsc::Sender<ApiEvent>,
    api_rx: mpsc::Receiver<ApiEvent>,
}

impl FinanceApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        api_base: &str,
        store: LocalStore,
        rt: tokio::runtime::Handle,
        cmd_tx: mpsc::Sender<ChatCommand>,
        chat_rx: mpsc::Receiver<ChatEvent>,
    ) -> Self {
        let (api_tx, api_rx) = mpsc::channel(100);

        let session = match store.load_session() {
            Ok(session) => session,
            Err(err) => {
                log::warn!("could not read stored session: {err}");
                None
            }
        };
        let api = match &session {
            Some(s) => ApiClient::new(api_base, Some(s.token.clone())),
            None => ApiClient::anonymous(api_base),
        };

        let mut app = Self {
            state: AppState::new(session),
            api,
            store,
            rt,
            cmd_tx,
            chat_rx,
            api_tx,
            api_rx,
        };

        if let Ok(previews) = app.store.all_last_messages() {
            app.state.chat.previews.extend(previews);
        }
        if let Some(session) = app.state.session_user.clone() {
            app.send_chat(ChatCommand::Connect {
                token: session.token,
            });
            app.refresh_for_view(View::Chat);
        }
        app
    }

    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ApiEvent> + Send + 'static,
    {
        let tx = self.api_tx.clone();
        self.rt.spawn(async move {
            if tx.send(fut.await).await.is_err() {
                log::warn!("UI gone; dropping api result");
            }
        });
    }

    fn send_chat(&self, command: ChatCommand) {
        if let Err(err) = self.cmd_tx.try_send(command) {
            log::warn!("failed to send command to chat task: {err}");
        }
    }

    fn my_user_id(&self) -> Option<String> {
        self.state.session_user.as_ref().map(|s| s.user_id.clone())
    }

    /// Drops the local session after a 401/403 or an explicit logout.
    fn force_logout(&mut self) {
        if let Err(err) = self.store.clear_session() {
            log::warn!("could not clear stored session: {err}");
        }
        if let Some(session) = &self.state.session_user {
            self.send_chat(ChatCommand::LeaveRoom {
                user_id: session.user_id.clone(),
            });
        }
        self.api = ApiClient::anonymous(self.api.base());
        self.state.reset_to_login();
    }

    fn note_api_error(&mut self, context: &str, err: crate::api::ApiError) {
        if err.is_unauthorized() {
            log::info!("session expired; back to login");
            self.force_logout();
            return;
        }
        log::error!("{context}: {err}");
        self.state.status_line = Some(format!("{context}: {err}"));
    }

    // ---- loaders ----

    fn refresh_rooms(&mut self, room_type: RoomType) {
        self.state.chat.rooms_loading = true;
        let api = self.api.clone();
        self.spawn(async move {
            ApiEvent::Rooms {
                room_type,
                rooms: api.list_rooms(room_type).await,
            }
        });
    }

    fn refresh_for_view(&mut self, view: View) {
        let api = self.api.clone();
        match view {
            View::Login => {}
            View::Chat => {
                self.refresh_rooms(self.state.chat.active_tab);
                self.spawn(async move { ApiEvent::Users(api.admin_users().await) });
                let api = self.api.clone();
                self.spawn(async move { ApiEvent::Profile(api.me().await) });
            }
            View::Promotions => {
                self.state.promotions.loading = true;
                self.spawn(async move {
                    ApiEvent::Promotions(
                        api.list_promotions(None, 0, 50).await.map(|p| p.content),
                    )
                });
            }
            View::Points => {
                let Some(user_id) = self.my_user_id() else { return };
                let history_id = user_id.clone();
                self.spawn(async move {
                    ApiEvent::PointSummary(api.point_summary(&user_id).await)
                });
                let api = self.api.clone();
                self.spawn(async move {
                    ApiEvent::PointHistory(api.point_history(&history_id).await)
                });
            }
            View::Products => {
                self.spawn(async move { ApiEvent::Products(api.list_products().await) });
                if let Some(user_id) = self.my_user_id() {
                    let api = self.api.clone();
                    let advisor = self.state.is_advisor();
                    self.spawn(async move {
                        let result = if advisor {
                            api.advisor_reservations(&user_id).await
                        } else {
                            api.user_reservations(&user_id).await
                        };
                        ApiEvent::MyReservations(result)
                    });
                }
            }
            View::Goals => {
                self.spawn(async move { ApiEvent::Goal(api.get_goal().await) });
                let api = self.api.clone();
                self.spawn(async move { ApiEvent::Reports(api.goal_reports().await) });
            }
            View::Accounts => {
                self.spawn(async move { ApiEvent::Accounts(api.accounts().await) });
                if self.state.is_admin() {
                    let api = self.api.clone();
                    self.spawn(
                        async move { ApiEvent::Transactions(api.all_transactions().await) },
                    );
                }
            }
            View::Admin => {
                self.spawn(async move { ApiEvent::PendingAdvisors(api.pending_advisors().await) });
                let api = self.api.clone();
                self.spawn(async move { ApiEvent::AllReservations(api.all_reservations().await) });
                let api = self.api.clone();
                self.spawn(async move {
                    ApiEvent::Promotions(
                        api.list_promotions(None, 0, 50).await.map(|p| p.content),
                    )
                });
            }
        }
    }

    fn switch_view(&mut self, view: View) {
        if self.state.view != view {
            self.state.view = view;
            self.refresh_for_view(view);
        }
    }

    // ---- event pumps ----

    fn handle_chat_events(&mut self) {
        while let Ok(event) = self.chat_rx.try_recv() {
            match event {
                ChatEvent::Connected => {
                    self.state.connected = true;
                    self.state.status_line = None;
                }
                ChatEvent::Disconnected => self.state.connected = false,
                ChatEvent::RoomJoined(room) => {
                    self.state.chat.session.begin_room(room);
                    self.state.chat.input_text.clear();
                    self.state.chat.pending_enter_notice = true;
                }
                ChatEvent::HistoryLoaded {
                    room_id,
                    page,
                    older,
                } => {
                    let chat = &mut self.state.chat;
                    chat.session.apply_history(&room_id, page, older);
                    if !older && chat.pending_enter_notice {
                        chat.pending_enter_notice = false;
                        if let Some(session) = &self.state.session_user {
                            if chat.session.room_id() == Some(room_id.as_str()) {
                                chat.session.push_local_notice(
                                    crate::common::ChatMessage::enter_notice(
                                        &room_id,
                                        &session.user_id,
                                        &session.name,
                                    ),
                                );
                            }
                        }
                    }
                }
                ChatEvent::MessageReceived { room_id, message } => {
                    let is_enter = message.is_enter;
                    let content = message.content.clone();
                    if self.state.chat.session.apply_push(&room_id, message) && !is_enter {
                        self.state.chat.previews.insert(room_id.clone(), content.clone());
                        if let Err(err) = self.store.cache_last_message(&room_id, &content) {
                            log::warn!("could not cache preview: {err}");
                        }
                    }
                }
                ChatEvent::RoomLeft { room_id } => {
                    if self.state.chat.session.room_id() == Some(room_id.as_str()) {
                        self.state.chat.session.clear();
                    }
                    self.state.chat.previews.remove(&room_id);
                    if let Err(err) = self.store.remove_last_message(&room_id) {
                        log::warn!("could not drop preview: {err}");
                    }
                    self.refresh_rooms(self.state.chat.active_tab);
                }
                ChatEvent::Error(message) => {
                    self.state.chat.session.abort_loading();
                    self.state.status_line = Some(message);
                }
            }
        }
    }

    fn handle_api_events(&mut self) {
        while let Ok(event) = self.api_rx.try_recv() {
            match event {
                ApiEvent::LoggedIn(Ok(login)) => {
                    self.state.login.busy = false;
                    let (Some(token), Some(user_id)) = (login.access_token, login.user_id)
                    else {
                        self.state.login.error = Some("malformed login response".to_string());
                        continue;
                    };
                    let session = StoredSession {
                        token: token.clone(),
                        user_id,
                        name: login.name.unwrap_or_default(),
                        role: login.role.unwrap_or_else(|| "USER".to_string()),
                    };
                    if let Err(err) = self.store.save_session(&session) {
                        log::warn!("could not persist session: {err}");
                    }
                    self.api = self.api.with_token(token.clone());
                    self.state.session_user = Some(session);
                    self.state.view = View::Chat;
                    self.send_chat(ChatCommand::Connect { token });
                    self.refresh_for_view(View::Chat);
                }
                ApiEvent::LoggedIn(Err(err)) => {
                    self.state.login.busy = false;
                    self.state.login.error = Some(format!("login failed: {err}"));
                }
                ApiEvent::SignedUp(Ok(())) => {
                    self.state.login.busy = false;
                    self.state.login.signup_mode = false;
                    self.state.login.error = Some("account created, sign in".to_string());
                }
                ApiEvent::SignedUp(Err(err)) => {
                    self.state.login.busy = false;
                    self.state.login.error = Some(format!("signup failed: {err}"));
                }
                ApiEvent::LoggedOut => self.force_logout(),
                ApiEvent::Profile(Ok(profile)) => {
                    // Role may have changed server-side (advisor approval).
                    if let Some(session) = self.state.session_user.as_mut() {
                        if let Some(role) = profile.role {
                            if role != session.role {
                                session.role = role;
                                let session = session.clone();
                                if let Err(err) = self.store.save_session(&session) {
                                    log::warn!("could not persist session: {err}");
                                }
                            }
                        }
                    }
                }
                ApiEvent::Profile(Err(err)) => self.note_api_error("profile", err),

                ApiEvent::Rooms { room_type, rooms } => {
                    if room_type == self.state.chat.active_tab {
                        self.state.chat.rooms_loading = false;
                        match rooms {
                            Ok(rooms) => {
                                // Server previews are authoritative; refresh
                                // the local cache with them.
                                for room in &rooms {
                                    if let Some(preview) = &room.last_message {
                                        self.state
                                            .chat
                                            .previews
                                            .insert(room.id.clone(), preview.clone());
                                        if let Err(err) =
                                            self.store.cache_last_message(&room.id, preview)
                                        {
                                            log::warn!("could not cache preview: {err}");
                                        }
                                    }
                                }
                                self.state.chat.rooms = rooms;
                            }
                            Err(err) => self.note_api_error("room list", err),
                        }
                    }
                }
                ApiEvent::RoomCreated(Ok(room)) => {
                    self.state.chat.show_new_room = false;
                    if room.room_type == self.state.chat.active_tab {
                        self.state.chat.rooms.push(room.clone());
                    }
                    self.send_chat(ChatCommand::JoinRoom { room });
                }
                ApiEvent::RoomCreated(Err(err)) => self.note_api_error("create room", err),
                ApiEvent::Users(Ok(users)) => self.state.chat.users = users,
                // The directory needs admin scope on some deployments; a
                // failure only disables the DM picker.
                ApiEvent::Users(Err(err)) => log::debug!("user directory unavailable: {err}"),

                ApiEvent::Promotions(result) => {
                    self.state.promotions.loading = false;
                    match result {
                        Ok(promotions) => self.state.promotions.promotions = promotions,
                        Err(err) => self.note_api_error("promotions", err),
                    }
                }
                ApiEvent::PromotionJoined(Ok(())) => {
                    self.state.promotions.notice = Some("Joined the draw".to_string());
                    self.refresh_for_view(View::Promotions);
                }
                ApiEvent::PromotionJoined(Err(err)) => self.note_api_error("join promotion", err),
                ApiEvent::Participation(Ok(participation)) => {
                    if participation.is_none() {
                        self.state.promotions.notice =
                            Some("You have not entered this one".to_string());
                    }
                    self.state.promotions.participation = participation;
                }
                ApiEvent::Participation(Err(err)) => self.note_api_error("participation", err),
                ApiEvent::PromotionMutated(Ok(())) => self.refresh_for_view(self.state.view),
                ApiEvent::PromotionMutated(Err(err)) => self.note_api_error("promotion", err),
                ApiEvent::PromotionStatus(Ok(status)) => {
                    self.state.admin.live_status = Some(status)
                }
                ApiEvent::PromotionStatus(Err(err)) => {
                    self.state.admin.monitored_promotion = None;
                    self.note_api_error("monitoring", err);
                }
                ApiEvent::Winners {
                    promotion_name,
                    winners,
                } => match winners {
                    Ok(winners) => {
                        self.state.admin.winners = winners;
                        self.state.admin.winners_of = Some(promotion_name);
                    }
                    Err(err) => self.note_api_error("winners", err),
                },
                ApiEvent::MonitoringAck(Ok(())) => {
                    self.state.status_line = Some("Slack notification sent".to_string())
                }
                ApiEvent::MonitoringAck(Err(err)) => self.note_api_error("slack", err),

                ApiEvent::PointSummary(Ok(summary)) => {
                    self.state.points.summary = Some(summary)
                }
                ApiEvent::PointSummary(Err(err)) => self.note_api_error("points", err),
                ApiEvent::PointHistory(Ok(history)) => self.state.points.history = history,
                ApiEvent::PointHistory(Err(err)) => self.note_api_error("point history", err),

                ApiEvent::Products(Ok(products)) => self.state.products.products = products,
                ApiEvent::Products(Err(err)) => self.note_api_error("products", err),
                ApiEvent::MyReservations(Ok(reservations)) => {
                    self.state.products.my_reservations = reservations
                }
                ApiEvent::MyReservations(Err(err)) => self.note_api_error("reservations", err),
                ApiEvent::AllReservations(Ok(reservations)) => {
                    self.state.admin.all_reservations = reservations
                }
                ApiEvent::AllReservations(Err(err)) => self.note_api_error("reservations", err),
                ApiEvent::PaymentStarted(Ok(init)) => {
                    self.state.products.pending_payment = Some(init)
                }
                ApiEvent::PaymentStarted(Err(err)) => self.note_api_error("payment", err),
                ApiEvent::PaymentConfirmed(Ok(())) => {
                    self.state.products.pending_payment = None;
                    self.state.products.payment_key_input.clear();
                    self.state.status_line = Some("Payment confirmed".to_string());
                    self.refresh_for_view(View::Products);
                }
                ApiEvent::PaymentConfirmed(Err(err)) => self.note_api_error("payment", err),
                ApiEvent::PaymentCancelled(Ok(())) => {
                    self.state.products.pending_payment = None;
                    self.state.products.payment_key_input.clear();
                    self.state.status_line = Some("Order cancelled".to_string());
                }
                ApiEvent::PaymentCancelled(Err(err)) => self.note_api_error("payment", err),

                ApiEvent::Goal(Ok(goal)) => {
                    self.state.goals.goal_exists = goal.is_some();
                    self.state.goals.goal = goal.unwrap_or_default();
                }
                ApiEvent::Goal(Err(err)) => self.note_api_error("goal", err),
                ApiEvent::GoalSaved(Ok(())) => {
                    self.state.goals.goal_exists = true;
                    self.state.status_line = Some("Goal saved".to_string());
                }
                ApiEvent::GoalSaved(Err(err)) => self.note_api_error("goal", err),
                ApiEvent::Reports(Ok(reports)) => self.state.goals.reports = reports,
                ApiEvent::Reports(Err(err)) => self.note_api_error("reports", err),
                ApiEvent::ReportResult(Ok(report)) => {
                    self.state.goals.analyzing = false;
                    self.state.goals.question.clear();
                    self.state.goals.open_report = Some(report);
                    let api = self.api.clone();
                    self.spawn(async move { ApiEvent::Reports(api.goal_reports().await) });
                }
                ApiEvent::ReportResult(Err(err)) => {
                    self.state.goals.analyzing = false;
                    self.note_api_error("analysis", err);
                }
                ApiEvent::ReportDeleted(Ok(())) => {
                    self.state.goals.open_report = None;
                    let api = self.api.clone();
                    self.spawn(async move { ApiEvent::Reports(api.goal_reports().await) });
                }
                ApiEvent::ReportDeleted(Err(err)) => self.note_api_error("report", err),

                ApiEvent::Accounts(Ok(accounts)) => self.state.accounts.accounts = accounts,
                ApiEvent::Accounts(Err(err)) => self.note_api_error("accounts", err),
                ApiEvent::Transactions(Ok(transactions)) => {
                    self.state.accounts.transactions = transactions
                }
                ApiEvent::Transactions(Err(err)) => self.note_api_error("transactions", err),
                ApiEvent::AccountLinked(Ok(())) => {
                    self.state.status_line = Some("Account linked".to_string());
                    self.refresh_for_view(View::Accounts);
                }
                ApiEvent::AccountLinked(Err(err)) => self.note_api_error("link account", err),

                ApiEvent::AdvisorApplied(Ok(())) => {
                    self.state.status_line =
                        Some("Advisor application submitted".to_string());
                }
                ApiEvent::AdvisorApplied(Err(err)) => self.note_api_error("apply", err),
                ApiEvent::PendingAdvisors(Ok(pending)) => {
                    self.state.admin.pending_advisors = pending
                }
                ApiEvent::PendingAdvisors(Err(err)) => self.note_api_error("advisors", err),
                ApiEvent::AdvisorApproved(Ok(())) => {
                    let api = self.api.clone();
                    self.spawn(
                        async move { ApiEvent::PendingAdvisors(api.pending_advisors().await) },
                    );
                }
                ApiEvent::AdvisorApproved(Err(err)) => self.note_api_error("approve", err),
            }
        }
    }

    /// Keeps the live counters fresh while a promotion is being monitored.
    fn poll_admin_monitor(&mut self) {
        if self.state.view != View::Admin {
            return;
        }
        let Some(promotion_id) = self.state.admin.monitored_promotion.clone() else {
            return;
        };
        let due = self
            .state
            .admin
            .last_poll
            .is_none_or(|at| at.elapsed() >= ADMIN_POLL_INTERVAL);
        if !due {
            return;
        }
        self.state.admin.last_poll = Some(Instant::now());
        let api = self.api.clone();
        self.spawn(async move { ApiEvent::PromotionStatus(api.promotion_status(&promotion_id).await) });
    }

    // ---- action dispatch ----

    fn on_login_action(&mut self, action: LoginAction) {
        let api = self.api.clone();
        match action {
            LoginAction::Login {
                user_name,
                password,
            } => self.spawn(async move {
                ApiEvent::LoggedIn(api.login(&user_name, &password).await)
            }),
            LoginAction::Signup {
                user_name,
                password,
                name,
            } => self.spawn(async move {
                ApiEvent::SignedUp(api.signup(&user_name, &password, &name).await)
            }),
        }
    }

    fn on_room_list_action(&mut self, action: RoomListAction) {
        match action {
            RoomListAction::Open(room) => {
                self.send_chat(ChatCommand::JoinRoom { room });
            }
            RoomListAction::SwitchTab(tab) => {
                self.state.chat.active_tab = tab;
                self.refresh_rooms(tab);
            }
            RoomListAction::NewRoom => self.state.chat.show_new_room = true,
            RoomListAction::Refresh => self.refresh_rooms(self.state.chat.active_tab),
        }
    }

    fn on_chat_action(&mut self, action: ChatAction) {
        match action {
            ChatAction::Send(content) => {
                let Some(room) = self.state.chat.session.room() else {
                    return;
                };
                self.send_chat(ChatCommand::SendMessage {
                    content,
                    room_type: room.room_type,
                });
            }
            ChatAction::LoadOlder => {
                let Some(room_id) = self.state.chat.session.room_id().map(str::to_string)
                else {
                    return;
                };
                if let Some(cursor) = self.state.chat.session.try_begin_older() {
                    self.send_chat(ChatCommand::LoadOlder { room_id, cursor });
                }
            }
            ChatAction::Leave => {
                if let Some(user_id) = self.my_user_id() {
                    self.send_chat(ChatCommand::LeaveRoom { user_id });
                }
            }
            ChatAction::CreateGroup(title) => {
                let api = self.api.clone();
                self.spawn(async move {
                    ApiEvent::RoomCreated(api.create_room(&CreateRoomRequest::group(&title)).await)
                });
            }
            ChatAction::StartDirect { user_id, user_name } => {
                let api = self.api.clone();
                self.spawn(async move {
                    ApiEvent::RoomCreated(
                        api.create_room(&CreateRoomRequest::direct(&user_id, &user_name))
                            .await,
                    )
                });
            }
            ChatAction::StartAi => {
                let Some(user_id) = self.my_user_id() else { return };
                let api = self.api.clone();
                self.spawn(async move {
                    ApiEvent::RoomCreated(api.create_room(&CreateRoomRequest::ai(&user_id)).await)
                });
            }
            ChatAction::CloseNewRoom => self.state.chat.show_new_room = false,
        }
    }

    fn on_promotions_action(&mut self, action: PromotionsAction) {
        let api = self.api.clone();
        match action {
            PromotionsAction::Refresh => self.refresh_for_view(View::Promotions),
            PromotionsAction::Join(id) => {
                self.spawn(async move { ApiEvent::PromotionJoined(api.join_promotion(&id).await) })
            }
            PromotionsAction::CheckResult(id) => {
                self.spawn(async move { ApiEvent::Participation(api.participation(&id).await) })
            }
        }
    }

    fn on_products_action(&mut self, action: ProductsAction) {
        let api = self.api.clone();
        match action {
            ProductsAction::Refresh => self.refresh_for_view(View::Products),
            ProductsAction::Buy {
                product_name,
                amount,
            } => {
                let Some(user_id) = self.my_user_id() else { return };
                self.spawn(async move {
                    ApiEvent::PaymentStarted(
                        api.init_payment(&user_id, &product_name, amount).await,
                    )
                });
            }
            ProductsAction::ConfirmPayment {
                payment_key,
                order_id,
                amount,
            } => self.spawn(async move {
                ApiEvent::PaymentConfirmed(
                    api.confirm_payment(&payment_key, &order_id, amount).await,
                )
            }),
            ProductsAction::CancelPayment { order_id } => self.spawn(async move {
                ApiEvent::PaymentCancelled(
                    api.cancel_payment(&order_id, "cancelled by user").await,
                )
            }),
            ProductsAction::CreateProduct {
                name,
                price,
                description,
            } => {
                let req = crate::api::CreateProductRequest::new(&name, price, &description);
                self.spawn(async move {
                    let result = api.create_product(&req).await;
                    match result {
                        Ok(()) => ApiEvent::Products(api.list_products().await),
                        Err(err) => ApiEvent::Products(Err(err)),
                    }
                });
            }
        }
    }

    fn on_goals_action(&mut self, action: GoalsAction) {
        let api = self.api.clone();
        match action {
            GoalsAction::Refresh => self.refresh_for_view(View::Goals),
            GoalsAction::Save => {
                let goal = self.state.goals.goal.clone();
                let exists = self.state.goals.goal_exists;
                self.spawn(async move { ApiEvent::GoalSaved(api.save_goal(&goal, exists).await) });
            }
            GoalsAction::Analyze(question) => {
                self.state.goals.analyzing = true;
                self.spawn(async move {
                    ApiEvent::ReportResult(api.create_report(&question).await)
                });
            }
            GoalsAction::ViewReport(id) => {
                self.spawn(async move { ApiEvent::ReportResult(api.view_report(&id).await) })
            }
            GoalsAction::DeleteReport(id) => {
                self.spawn(async move { ApiEvent::ReportDeleted(api.delete_report(&id).await) })
            }
        }
    }

    fn on_accounts_action(&mut self, action: AccountsAction) {
        let api = self.api.clone();
        match action {
            AccountsAction::Refresh => self.refresh_for_view(View::Accounts),
            AccountsAction::Link {
                organization,
                bank_id,
            } => self.spawn(async move {
                ApiEvent::AccountLinked(api.link_account(&organization, &bank_id).await)
            }),
        }
    }

    fn on_admin_action(&mut self, action: AdminAction) {
        let api = self.api.clone();
        match action {
            AdminAction::Refresh => self.refresh_for_view(View::Admin),
            AdminAction::ApproveAdvisor(id) => {
                self.spawn(async move { ApiEvent::AdvisorApproved(api.approve_advisor(&id).await) })
            }
            AdminAction::CreatePromotion => {
                let form = &self.state.admin.new_promotion;
                let (Ok(point_amount), Ok(total_stock)) = (
                    form.point_amount.trim().parse::<i64>(),
                    form.total_stock.trim().parse::<i64>(),
                ) else {
                    self.state.status_line = Some("points and stock must be numbers".to_string());
                    return;
                };
                let req = CreatePromotionRequest {
                    name: form.name.trim().to_string(),
                    point_amount,
                    total_stock,
                    start_time: form.start_time.trim().to_string(),
                    end_time: form.end_time.trim().to_string(),
                };
                self.state.admin.new_promotion = Default::default();
                self.spawn(async move {
                    ApiEvent::PromotionMutated(api.create_promotion(&req).await)
                });
            }
            AdminAction::StartPromotion(id) => self.spawn(async move {
                ApiEvent::PromotionMutated(
                    api.transition_promotion(&id, PromotionAction::Start).await,
                )
            }),
            AdminAction::EndPromotion(id) => self.spawn(async move {
                ApiEvent::PromotionMutated(
                    api.transition_promotion(&id, PromotionAction::End).await,
                )
            }),
            AdminAction::Monitor(id) => {
                self.state.admin.monitored_promotion = Some(id);
                self.state.admin.last_poll = None;
            }
            AdminAction::ShowWinners { id, name } => self.spawn(async move {
                ApiEvent::Winners {
                    promotion_name: name,
                    winners: api.promotion_winners(&id).await,
                }
            }),
            AdminAction::SendManualReport => {
                self.spawn(async move { ApiEvent::MonitoringAck(api.send_manual_report().await) })
            }
            AdminAction::SendSlackTest => {
                self.spawn(async move { ApiEvent::MonitoringAck(api.send_monitoring_test().await) })
            }
        }
    }

    fn render_nav(&mut self, ctx: &egui::Context) {
        let mut switch_to = None;
        let mut logout = false;
        let mut apply_advisor = false;
        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("FinMate");
                ui.separator();
                let mut tabs = vec![
                    View::Chat,
                    View::Promotions,
                    View::Points,
                    View::Products,
                    View::Goals,
                    View::Accounts,
                ];
                if self.state.is_admin() {
                    tabs.push(View::Admin);
                }
                for tab in tabs {
                    if ui
                        .selectable_label(self.state.view == tab, tab.title())
                        .clicked()
                    {
                        switch_to = Some(tab);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Logout").clicked() {
                        logout = true;
                    }
                    if let Some(session) = &self.state.session_user {
                        ui.weak(format!("{} ({})", session.name, session.role));
                        if session.role == "USER" && ui.small_button("Become an advisor").clicked()
                        {
                            apply_advisor = true;
                        }
                    }
                });
            });
        });
        if let Some(view) = switch_to {
            self.switch_view(view);
        }
        if apply_advisor {
            let api = self.api.clone();
            self.spawn(async move { ApiEvent::AdvisorApplied(api.apply_advisor().await) });
        }
        if logout {
            let api = self.api.clone();
            self.spawn(async move {
                if let Err(err) = api.logout().await {
                    log::debug!("logout call failed: {err}");
                }
                ApiEvent::LoggedOut
            });
        }
    }
}

impl eframe::App for FinanceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_chat_events();
        self.handle_api_events();
        self.poll_admin_monitor();

        if self.state.session_user.is_none() {
            let action = egui::CentralPanel::default()
                .show(ctx, |ui| login::render(ui, &mut self.state.login))
                .inner;
            if let Some(action) = action {
                self.on_login_action(action);
            }
            ctx.request_repaint();
            return;
        }

        self.render_nav(ctx);

        if let Some(status) = self.state.status_line.clone() {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.weak(&status);
                    if ui.small_button("x").clicked() {
                        self.state.status_line = None;
                    }
                });
            });
        }

        match self.state.view {
            View::Login => {}
            View::Chat => {
                let side_action = egui::SidePanel::left("rooms")
                    .default_width(220.0)
                    .show(ctx, |ui| room_list::render(ui, &self.state.chat))
                    .inner;
                if let Some(action) = side_action {
                    self.on_room_list_action(action);
                }

                let my_id = self.my_user_id();
                let connected = self.state.connected;
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        chat::render(ui, &mut self.state.chat, connected, my_id.as_deref())
                    })
                    .inner;
                if let Some(action) = action {
                    self.on_chat_action(action);
                }
            }
            View::Promotions => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| promotions::render(ui, &mut self.state.promotions))
                    .inner;
                if let Some(action) = action {
                    self.on_promotions_action(action);
                }
            }
            View::Points => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| points::render(ui, &self.state.points))
                    .inner;
                if let Some(PointsAction::Refresh) = action {
                    self.refresh_for_view(View::Points);
                }
            }
            View::Products => {
                let is_advisor = self.state.is_advisor();
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        products::render(ui, &mut self.state.products, is_advisor)
                    })
                    .inner;
                if let Some(action) = action {
                    self.on_products_action(action);
                }
            }
            View::Goals => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| goals::render(ui, &mut self.state.goals))
                    .inner;
                if let Some(action) = action {
                    self.on_goals_action(action);
                }
            }
            View::Accounts => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| accounts::render(ui, &mut self.state.accounts))
                    .inner;
                if let Some(action) = action {
                    self.on_accounts_action(action);
                }
            }
            View::Admin => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        admin::render(
                            ui,
                            &mut self.state.admin,
                            &self.state.promotions.promotions,
                        )
                    })
                    .inner;
                if let Some(action) = action {
                    self.on_admin_action(action);
                }
            }
        }

        ctx.request_repaint();
    }
}
