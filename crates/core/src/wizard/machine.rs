use std::sync::Arc;

use chrono::Local;

use crate::bridge::{self, LocalDraftStore};
use crate::domain::addon::{AddonCatalogEntry, AddonId};
use crate::domain::draft::BookingDraft;
use crate::domain::order::{OrderId, OrderRecord};
use crate::domain::service::{ServiceCatalogEntry, ServiceCategory, ServiceId};
use crate::errors::{BookingError, ValidationError};
use crate::pricing::{self, PaymentTerms, PriceBreakdown};
use crate::recommend::{self, RecommendationResult};
use crate::wizard::steps::{AdvanceOutcome, Step, WizardAction};
use crate::wizard::{NotificationDispatch, OrderSink, Session};

/// Owns the in-progress draft and the current step. All mutation goes
/// through [`WizardMachine::apply`]; the recommendation and price are
/// recomputed synchronously after the mutation that invalidated them,
/// so no observer ever sees derived values lag the draft.
pub struct WizardMachine {
    services: Arc<Vec<ServiceCatalogEntry>>,
    addons: Arc<Vec<AddonCatalogEntry>>,
    terms: PaymentTerms,
    draft: BookingDraft,
    step: Step,
    recommendation: Option<RecommendationResult>,
}

impl WizardMachine {
    pub fn new(
        services: Arc<Vec<ServiceCatalogEntry>>,
        addons: Arc<Vec<AddonCatalogEntry>>,
        terms: PaymentTerms,
    ) -> Self {
        Self {
            services,
            addons,
            terms,
            draft: BookingDraft::new(),
            step: Step::CategorySelection,
            recommendation: None,
        }
    }

    /// Reopens the wizard from a resumed guest draft (see
    /// [`crate::bridge::try_resume_draft`]).
    pub fn resumed(
        services: Arc<Vec<ServiceCatalogEntry>>,
        addons: Arc<Vec<AddonCatalogEntry>>,
        terms: PaymentTerms,
        draft: BookingDraft,
        step: Step,
    ) -> Self {
        let mut machine = Self {
            services,
            addons,
            terms,
            draft,
            step: step.min(Step::Scheduling),
            recommendation: None,
        };
        machine.refresh_recommendation();
        machine
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn recommendation(&self) -> Option<&RecommendationResult> {
        self.recommendation.as_ref()
    }

    /// Current totals for display; `None` until enough of the draft is
    /// configured to price it.
    pub fn price_preview(&self) -> Option<PriceBreakdown> {
        pricing::compute_final_price(&self.draft, &self.terms).ok()
    }

    /// Single mutation entry point. Cascade-clear rules run inside the
    /// draft setters; derived values are refreshed before returning.
    pub fn apply(&mut self, action: WizardAction) -> Result<(), ValidationError> {
        match action {
            WizardAction::SelectCategory(category) => {
                self.draft.set_category(category);
                self.auto_select_default_service(category);
            }
            WizardAction::SelectService(id) => {
                let service = self.find_service(id)?;
                self.draft.set_service(service);
            }
            WizardAction::SelectPropertySize(size) => {
                self.draft.set_property_size(size);
            }
            WizardAction::SelectCrewSize(crew) => {
                if !(1..=4).contains(&crew) {
                    return Err(ValidationError::InvalidCrewSize(crew));
                }
                self.draft.set_crew_size(crew);
            }
            WizardAction::SelectDuration(hours) => {
                if !recommend::is_half_hour_step(hours) {
                    return Err(ValidationError::InvalidDuration(hours.to_string()));
                }
                self.draft.set_duration_hours(hours);
            }
            WizardAction::SetOwnMaterials(uses_own) => {
                self.draft.set_uses_own_materials(uses_own);
            }
            WizardAction::SetPanelCount(panels) => {
                if panels == 0 {
                    return Err(ValidationError::InvalidPanelCount);
                }
                self.draft.set_panel_count(panels);
            }
            WizardAction::ToggleAddon(id) => {
                let addon = self.find_addon(id)?;
                self.draft.toggle_addon(addon);
            }
            WizardAction::SetSchedule { date, time } => {
                if date <= Local::now().date_naive() {
                    return Err(ValidationError::ScheduleNotInFuture(date));
                }
                self.draft.set_schedule(date, time);
            }
            WizardAction::SetContact(contact) => {
                self.draft.set_contact(contact);
            }
            WizardAction::SelectPaymentMethod(method) => {
                self.draft.set_payment_method(method);
            }
        }

        self.refresh_recommendation();
        Ok(())
    }

    /// Guarded forward transition. Guests cannot pass the scheduling
    /// step: their draft is persisted and the machine stays put.
    pub fn advance(
        &mut self,
        session: &Session,
        draft_store: &dyn LocalDraftStore,
    ) -> Result<AdvanceOutcome, BookingError> {
        match self.step {
            Step::CategorySelection => {
                self.guard(Step::CategorySelection)?;
                self.step = Step::ServiceConfiguration;
                Ok(AdvanceOutcome::Advanced(self.step))
            }
            Step::ServiceConfiguration => {
                self.guard(Step::ServiceConfiguration)?;
                self.step = Step::Scheduling;
                Ok(AdvanceOutcome::Advanced(self.step))
            }
            Step::Scheduling => {
                self.guard(Step::Scheduling)?;
                if !session.is_authenticated() {
                    bridge::persist_draft(draft_store, &self.draft, self.step)
                        .map_err(|error| BookingError::DraftStore(error.to_string()))?;
                    tracing::info!("guest reached scheduling; sign-up required");
                    return Ok(AdvanceOutcome::SignupRequired);
                }
                self.step = Step::ContactAndPayment;
                Ok(AdvanceOutcome::Advanced(self.step))
            }
            Step::ContactAndPayment => Err(ValidationError::SubmissionRequired.into()),
            Step::Confirmation => Err(ValidationError::WizardComplete.into()),
        }
    }

    /// Backward navigation is always permitted and never re-validates.
    /// The confirmation step is terminal.
    pub fn back(&mut self) -> Option<Step> {
        if self.step == Step::Confirmation {
            return None;
        }
        let previous = self.step.previous()?;
        self.step = previous;
        Some(previous)
    }

    /// Converts the draft into an order record and hands it to the sink,
    /// exactly once per successful submission. Exclusive access through
    /// `&mut self` keeps calls sequential, and a success moves the step
    /// to confirmation so a repeat call is refused before the sink.
    pub async fn submit(
        &mut self,
        sink: &dyn OrderSink,
        notifications: &dyn NotificationDispatch,
    ) -> Result<OrderId, BookingError> {
        match self.step {
            Step::ContactAndPayment => {}
            Step::Confirmation => return Err(ValidationError::WizardComplete.into()),
            _ => return Err(ValidationError::SubmissionUnavailable.into()),
        }

        // Full re-validation: a mutation to an earlier step's fields
        // must never reach the sink against stale derived state.
        self.guard(Step::CategorySelection)?;
        self.guard(Step::ServiceConfiguration)?;
        self.guard(Step::Scheduling)?;
        self.guard(Step::ContactAndPayment)?;

        let breakdown = pricing::compute_final_price(&self.draft, &self.terms)?;
        let record = OrderRecord::from_draft(&self.draft, breakdown)?;

        tracing::info!(order_id = %record.id, total = %record.pricing.total, "submitting order");
        match sink.create(&record).await {
            Ok(order_id) => {
                notifications.order_created(&record).await;
                self.step = Step::Confirmation;
                Ok(order_id)
            }
            Err(error) => {
                tracing::warn!(%error, "order submission failed; draft retained");
                Err(BookingError::SubmissionFailed(error.to_string()))
            }
        }
    }

    fn guard(&self, step: Step) -> Result<(), ValidationError> {
        match step {
            Step::CategorySelection => {
                if self.draft.category.is_none() {
                    return Err(ValidationError::MissingCategory);
                }
            }
            Step::ServiceConfiguration => {
                if self.draft.service.is_none() {
                    return Err(ValidationError::MissingService);
                }
                if self.draft.requires_panel_count() && self.draft.window_panel_count.is_none() {
                    return Err(ValidationError::MissingPanelCount);
                }
                if self.draft.requires_hourly_config() {
                    if self.draft.property_size.is_none() {
                        return Err(ValidationError::MissingPropertySize);
                    }
                    if self.draft.crew_size.is_none() {
                        return Err(ValidationError::MissingCrewSize);
                    }
                    if self.draft.duration_hours.is_none() {
                        return Err(ValidationError::MissingDuration);
                    }
                }
            }
            Step::Scheduling => {
                let date = self.draft.scheduled_date.ok_or(ValidationError::MissingSchedule)?;
                if self.draft.scheduled_time.is_none() {
                    return Err(ValidationError::MissingSchedule);
                }
                // Re-checked here: a date picked yesterday may be today
                // by now.
                if date <= Local::now().date_naive() {
                    return Err(ValidationError::ScheduleNotInFuture(date));
                }
            }
            Step::ContactAndPayment => {
                let contact = self.draft.contact.as_ref().ok_or(ValidationError::MissingContact)?;
                contact.validate()?;
            }
            Step::Confirmation => {}
        }
        Ok(())
    }

    fn refresh_recommendation(&mut self) {
        self.recommendation = match (self.draft.requires_hourly_config(), self.draft.service_type())
        {
            (true, Some(service_type)) => self.draft.property_size.map(|size| {
                recommend::recommend(
                    service_type,
                    size,
                    self.draft.crew_size,
                    self.draft.uses_own_materials,
                )
            }),
            _ => None,
        };
    }

    /// Regular and deep categories default to the "without materials"
    /// variant; packages and specialized services are chosen explicitly.
    fn auto_select_default_service(&mut self, category: ServiceCategory) {
        if !matches!(category, ServiceCategory::Regular | ServiceCategory::Deep) {
            return;
        }
        let default = self
            .services
            .iter()
            .find(|service| {
                service.category == category && service.active && !service.includes_materials
            })
            .cloned();
        if let Some(service) = default {
            self.draft.set_service(service);
        }
    }

    fn find_service(&self, id: ServiceId) -> Result<ServiceCatalogEntry, ValidationError> {
        self.services
            .iter()
            .find(|service| service.id == id && service.active)
            .cloned()
            .ok_or(ValidationError::UnknownService(id))
    }

    fn find_addon(&self, id: AddonId) -> Result<AddonCatalogEntry, ValidationError> {
        self.addons
            .iter()
            .find(|addon| addon.id == id)
            .cloned()
            .ok_or(ValidationError::UnknownAddon(id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, NaiveTime};
    use rust_decimal::Decimal;

    use super::*;
    use crate::bridge::{DraftSnapshot, DraftStoreError};
    use crate::domain::contact::{AddressCandidate, ContactDetails};
    use crate::domain::draft::PaymentMethod;
    use crate::domain::service::{
        PricingMode, PropertySize, WINDOW_FULL_PACKAGE_SERVICE,
    };
    use crate::wizard::OrderSinkError;

    fn service(
        id: i64,
        category: ServiceCategory,
        service_type: &str,
        mode: PricingMode,
        includes_materials: bool,
    ) -> ServiceCatalogEntry {
        ServiceCatalogEntry {
            id: ServiceId(id),
            name: format!("service-{id}"),
            category,
            service_type: service_type.to_string(),
            pricing_mode: mode,
            base_price: Decimal::from(350),
            unit_price: (mode == PricingMode::PerUnit).then(|| Decimal::from(20)),
            includes_materials,
            active: true,
        }
    }

    fn catalog() -> (Arc<Vec<ServiceCatalogEntry>>, Arc<Vec<AddonCatalogEntry>>) {
        let services = vec![
            service(101, ServiceCategory::Regular, "regular", PricingMode::Hourly, false),
            service(102, ServiceCategory::Regular, "regular", PricingMode::Hourly, true),
            service(201, ServiceCategory::Deep, "deep", PricingMode::Hourly, false),
            service(301, ServiceCategory::Packages, "regular", PricingMode::Flat, true),
            service(401, ServiceCategory::Specialized, "window", PricingMode::PerUnit, true),
            service(
                WINDOW_FULL_PACKAGE_SERVICE.0,
                ServiceCategory::Specialized,
                "window",
                PricingMode::PerUnit,
                true,
            ),
        ];
        let addons = vec![AddonCatalogEntry {
            id: AddonId(11),
            name: "Fridge interior".to_string(),
            price: Decimal::from(30),
            category: "kitchen".to_string(),
            subcategory: None,
            unit: "per item".to_string(),
        }];
        (Arc::new(services), Arc::new(addons))
    }

    fn machine() -> WizardMachine {
        let (services, addons) = catalog();
        WizardMachine::new(services, addons, PaymentTerms::default())
    }

    #[derive(Default)]
    struct MemoryStore {
        slot: Mutex<Option<DraftSnapshot>>,
    }

    impl LocalDraftStore for MemoryStore {
        fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftStoreError> {
            *self.slot.lock().expect("lock") = Some(snapshot.clone());
            Ok(())
        }

        fn load(&self) -> Result<Option<DraftSnapshot>, DraftStoreError> {
            Ok(self.slot.lock().expect("lock").clone())
        }

        fn clear(&self) -> Result<(), DraftStoreError> {
            *self.slot.lock().expect("lock") = None;
            Ok(())
        }
    }

    struct RecordingSink {
        orders: Mutex<Vec<OrderRecord>>,
        fail: bool,
    }

    impl RecordingSink {
        fn new(fail: bool) -> Self {
            Self { orders: Mutex::new(Vec::new()), fail }
        }
    }

    #[async_trait]
    impl OrderSink for RecordingSink {
        async fn create(&self, order: &OrderRecord) -> Result<OrderId, OrderSinkError> {
            if self.fail {
                return Err(OrderSinkError("write rejected".to_string()));
            }
            self.orders.lock().expect("lock").push(order.clone());
            Ok(order.id)
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl NotificationDispatch for CountingNotifier {
        async fn order_created(&self, _order: &OrderRecord) {
            self.sent.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn tomorrow() -> chrono::NaiveDate {
        Local::now().date_naive() + Duration::days(1)
    }

    fn ten_am() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).expect("valid time")
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            name: "Amira Khalil".to_string(),
            phone: "+971501234567".to_string(),
            address: Some(AddressCandidate {
                id: "addr-1".to_string(),
                label: "Marina Heights, Apt 1203".to_string(),
            }),
            notes: None,
        }
    }

    /// Drives a fresh machine to the contact step as an authenticated
    /// user with a fully configured hourly draft.
    fn machine_at_contact() -> WizardMachine {
        let mut machine = machine();
        let store = MemoryStore::default();
        let session = Session::Authenticated { user_id: "user-1".to_string() };

        machine.apply(WizardAction::SelectCategory(ServiceCategory::Regular)).expect("category");
        machine.advance(&session, &store).expect("to configuration");
        machine.apply(WizardAction::SelectPropertySize(PropertySize::Medium)).expect("size");
        machine.apply(WizardAction::SelectCrewSize(2)).expect("crew");
        machine.apply(WizardAction::SelectDuration(Decimal::from(5))).expect("hours");
        machine.advance(&session, &store).expect("to scheduling");
        machine
            .apply(WizardAction::SetSchedule { date: tomorrow(), time: ten_am() })
            .expect("schedule");
        machine.advance(&session, &store).expect("to contact");
        machine.apply(WizardAction::SetContact(contact())).expect("contact");
        machine
    }

    #[test]
    fn regular_category_auto_selects_the_no_materials_variant() {
        let mut machine = machine();
        machine.apply(WizardAction::SelectCategory(ServiceCategory::Regular)).expect("category");

        let selected = machine.draft().service.as_ref().expect("default service");
        assert_eq!(selected.id, ServiceId(101));
        assert!(!selected.includes_materials);
    }

    #[test]
    fn packages_category_leaves_the_service_choice_open() {
        let mut machine = machine();
        machine.apply(WizardAction::SelectCategory(ServiceCategory::Packages)).expect("category");
        assert_eq!(machine.draft().service, None);
    }

    #[test]
    fn advance_refuses_until_the_step_guard_holds() {
        let mut machine = machine();
        let store = MemoryStore::default();
        let session = Session::Authenticated { user_id: "user-1".to_string() };

        let error = machine.advance(&session, &store).expect_err("no category yet");
        assert_eq!(error, BookingError::Validation(ValidationError::MissingCategory));

        machine.apply(WizardAction::SelectCategory(ServiceCategory::Regular)).expect("category");
        machine.advance(&session, &store).expect("to configuration");

        // Hourly service: size, crew and duration are all required.
        let error = machine.advance(&session, &store).expect_err("unconfigured");
        assert_eq!(error, BookingError::Validation(ValidationError::MissingPropertySize));
    }

    #[test]
    fn per_panel_window_service_requires_a_panel_count() {
        let mut machine = machine();
        let store = MemoryStore::default();
        let session = Session::Authenticated { user_id: "user-1".to_string() };

        machine
            .apply(WizardAction::SelectCategory(ServiceCategory::Specialized))
            .expect("category");
        machine.advance(&session, &store).expect("to configuration");
        machine.apply(WizardAction::SelectService(ServiceId(401))).expect("service");

        let error = machine.advance(&session, &store).expect_err("no panel count");
        assert_eq!(error, BookingError::Validation(ValidationError::MissingPanelCount));

        machine.apply(WizardAction::SetPanelCount(10)).expect("panels");
        machine.advance(&session, &store).expect("to scheduling");
    }

    #[test]
    fn full_package_window_service_needs_no_panel_count() {
        let mut machine = machine();
        let store = MemoryStore::default();
        let session = Session::Authenticated { user_id: "user-1".to_string() };

        machine
            .apply(WizardAction::SelectCategory(ServiceCategory::Specialized))
            .expect("category");
        machine.advance(&session, &store).expect("to configuration");
        machine
            .apply(WizardAction::SelectService(WINDOW_FULL_PACKAGE_SERVICE))
            .expect("service");
        machine.advance(&session, &store).expect("to scheduling");
    }

    #[test]
    fn scheduling_today_is_rejected_at_day_granularity() {
        let mut machine = machine();
        let today = Local::now().date_naive();

        let error = machine
            .apply(WizardAction::SetSchedule { date: today, time: ten_am() })
            .expect_err("today must be rejected");
        assert_eq!(error, ValidationError::ScheduleNotInFuture(today));

        machine
            .apply(WizardAction::SetSchedule { date: tomorrow(), time: ten_am() })
            .expect("tomorrow is fine");
    }

    #[test]
    fn recommendation_tracks_service_size_and_crew() {
        let mut machine = machine();
        machine.apply(WizardAction::SelectCategory(ServiceCategory::Regular)).expect("category");
        assert!(machine.recommendation().is_none());

        machine.apply(WizardAction::SelectPropertySize(PropertySize::Medium)).expect("size");
        let recommendation = machine.recommendation().expect("recommendation");
        assert_eq!(recommendation.recommended_crew_size, 2);
        assert_eq!(recommendation.recommended_duration_hours, Decimal::from(5));
        assert_eq!(recommendation.estimated_cost, Decimal::from(450));

        // A manual crew override changes duration and cost, not crew.
        machine.apply(WizardAction::SelectCrewSize(4)).expect("crew");
        let recommendation = machine.recommendation().expect("recommendation");
        assert_eq!(recommendation.recommended_crew_size, 4);
        assert_eq!(recommendation.recommended_duration_hours, Decimal::new(35, 1));
    }

    #[test]
    fn single_cleaner_is_selectable_but_never_recommended() {
        let mut machine = machine();
        machine.apply(WizardAction::SelectCategory(ServiceCategory::Regular)).expect("category");
        machine.apply(WizardAction::SelectPropertySize(PropertySize::Small)).expect("size");
        machine.apply(WizardAction::SelectCrewSize(1)).expect("one cleaner is allowed");
        assert_eq!(machine.draft().crew_size, Some(1));

        let error = machine.apply(WizardAction::SelectCrewSize(5)).expect_err("out of range");
        assert_eq!(error, ValidationError::InvalidCrewSize(5));
    }

    #[test]
    fn duration_must_be_a_half_hour_step() {
        let mut machine = machine();
        let error = machine
            .apply(WizardAction::SelectDuration(Decimal::new(33, 1)))
            .expect_err("3.3h is not a half-hour step");
        assert!(matches!(error, ValidationError::InvalidDuration(_)));
    }

    #[test]
    fn guest_is_intercepted_at_the_scheduling_boundary() {
        let mut machine = machine();
        let store = MemoryStore::default();
        let guest = Session::Guest;

        machine.apply(WizardAction::SelectCategory(ServiceCategory::Regular)).expect("category");
        machine.advance(&guest, &store).expect("to configuration");
        machine.apply(WizardAction::SelectPropertySize(PropertySize::Medium)).expect("size");
        machine.apply(WizardAction::SelectCrewSize(2)).expect("crew");
        machine.apply(WizardAction::SelectDuration(Decimal::from(5))).expect("hours");
        machine.advance(&guest, &store).expect("to scheduling");
        machine
            .apply(WizardAction::SetSchedule { date: tomorrow(), time: ten_am() })
            .expect("schedule");

        let outcome = machine.advance(&guest, &store).expect("intercepted");
        assert_eq!(outcome, AdvanceOutcome::SignupRequired);
        assert_eq!(machine.step(), Step::Scheduling);

        let snapshot = store.load().expect("load").expect("persisted snapshot");
        assert_eq!(snapshot.service_id, Some(101));
        assert_eq!(snapshot.step, Step::Scheduling.number());
    }

    #[test]
    fn back_never_validates_and_stops_at_the_first_step() {
        let mut machine = machine_at_contact();
        assert_eq!(machine.back(), Some(Step::Scheduling));
        assert_eq!(machine.back(), Some(Step::ServiceConfiguration));
        assert_eq!(machine.back(), Some(Step::CategorySelection));
        assert_eq!(machine.back(), None);
    }

    #[tokio::test]
    async fn submission_creates_exactly_one_order_and_confirms() {
        let mut machine = machine_at_contact();
        let sink = RecordingSink::new(false);
        let notifier = CountingNotifier::default();

        let order_id = machine.submit(&sink, &notifier).await.expect("submitted");
        assert_eq!(machine.step(), Step::Confirmation);
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);

        let orders = sink.orders.lock().expect("lock");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, order_id);
        assert_eq!(orders[0].pricing.total, Decimal::new(4775, 1));
        assert_eq!(orders[0].payment_method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn submit_before_the_contact_step_never_reaches_the_sink() {
        let mut machine = machine();
        let sink = RecordingSink::new(false);
        let notifier = CountingNotifier::default();

        let error = machine.submit(&sink, &notifier).await.expect_err("not at contact step");
        assert_eq!(error, BookingError::Validation(ValidationError::SubmissionUnavailable));
        assert!(sink.orders.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn double_submit_after_confirmation_is_refused() {
        let mut machine = machine_at_contact();
        let sink = RecordingSink::new(false);
        let notifier = CountingNotifier::default();

        machine.submit(&sink, &notifier).await.expect("first submit");
        let error = machine.submit(&sink, &notifier).await.expect_err("second submit");
        assert_eq!(error, BookingError::Validation(ValidationError::WizardComplete));
        assert_eq!(sink.orders.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn failed_submission_keeps_the_draft_and_step() {
        let mut machine = machine_at_contact();
        let sink = RecordingSink::new(true);
        let notifier = CountingNotifier::default();

        let error = machine.submit(&sink, &notifier).await.expect_err("sink rejects");
        assert!(matches!(error, BookingError::SubmissionFailed(_)));
        assert_eq!(machine.step(), Step::ContactAndPayment);
        assert!(machine.draft().contact.is_some());
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 0);

        // Resubmission works without re-entering anything.
        let sink = RecordingSink::new(false);
        machine.submit(&sink, &notifier).await.expect("resubmit");
        assert_eq!(machine.step(), Step::Confirmation);
    }

    #[tokio::test]
    async fn late_upstream_mutation_blocks_submission() {
        let mut machine = machine_at_contact();

        // Changing the property size on step 4 cascades: crew and
        // duration are cleared, so the stale price cannot be submitted.
        machine.apply(WizardAction::SelectPropertySize(PropertySize::Villa)).expect("size");
        assert_eq!(machine.draft().crew_size, None);

        let sink = RecordingSink::new(false);
        let notifier = CountingNotifier::default();
        let error = machine.submit(&sink, &notifier).await.expect_err("stale draft");
        assert_eq!(error, BookingError::Validation(ValidationError::MissingCrewSize));
        assert!(sink.orders.lock().expect("lock").is_empty());
    }

    #[test]
    fn price_preview_follows_the_draft() {
        let mut machine = machine();
        assert!(machine.price_preview().is_none());

        machine.apply(WizardAction::SelectCategory(ServiceCategory::Regular)).expect("category");
        machine.apply(WizardAction::SelectPropertySize(PropertySize::Medium)).expect("size");
        machine.apply(WizardAction::SelectCrewSize(2)).expect("crew");
        machine.apply(WizardAction::SelectDuration(Decimal::from(5))).expect("hours");
        machine.apply(WizardAction::ToggleAddon(AddonId(11))).expect("addon");

        let preview = machine.price_preview().expect("priced");
        assert_eq!(preview.base, Decimal::from(450));
        assert_eq!(preview.addons, Decimal::from(30));
        assert_eq!(preview.total, Decimal::new(50900, 2));
    }
}
