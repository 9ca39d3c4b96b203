use crate::model::{
    area::{CommonArea, ReservationRule},
    interval,
    reservation::Reservation,
};
use chrono::{DateTime, Duration, Utc};
use shared::error::{AppError, AppResult, PolicyViolation};

// 予約作成リクエストをエリアの予約ルールに照らして検証する。
// 複数ルールがある場合はすべてを満たさなければならない
pub fn validate(
    area: &CommonArea,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    attendees: i32,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if !area.is_active {
        return Err(AppError::ResourceInactive(area.name.clone()));
    }

    if attendees < 1 {
        return Err(PolicyViolation::InvalidAttendeeCount { attendees }.into());
    }

    let actual_minutes = interval::duration_minutes(start, end)?;

    for rule in active_rules(&area.rules) {
        let min_minutes = rule.min_duration_minutes.map(i64::from);
        let max_minutes = rule.max_duration_minutes.map(i64::from);
        let too_short = min_minutes.is_some_and(|min| actual_minutes < min);
        let too_long = max_minutes.is_some_and(|max| actual_minutes > max);
        if too_short || too_long {
            return Err(PolicyViolation::DurationOutOfRange {
                actual_minutes,
                min_minutes,
                max_minutes,
            }
            .into());
        }
        if let Some(max_attendees) = rule.max_attendees {
            if attendees > max_attendees {
                return Err(PolicyViolation::AttendeeLimitExceeded {
                    attendees,
                    max_attendees,
                }
                .into());
            }
        }
    }

    if start < now {
        return Err(PolicyViolation::StartInPast.into());
    }

    for rule in active_rules(&area.rules) {
        if let Some(max_advance_days) = rule.max_advance_days {
            let max_advance_days = i64::from(max_advance_days);
            if start > now + Duration::days(max_advance_days) {
                return Err(PolicyViolation::AdvanceWindowExceeded { max_advance_days }.into());
            }
        }
    }

    Ok(())
}

// キャンセル可否の判定。
// override_capable（管理側の操作）はキャンセルポリシーの対象外
pub fn can_cancel(
    rules: &[ReservationRule],
    reservation: &Reservation,
    now: DateTime<Utc>,
    override_capable: bool,
) -> AppResult<()> {
    if override_capable {
        return Ok(());
    }

    // キャンセルを許可するルールのうち、最も短い事前時間を採用する
    let required_hours = active_rules(rules)
        .filter(|rule| rule.allow_cancellation)
        .map(|rule| i64::from(rule.cancellation_hours))
        .min();

    match required_hours {
        None if rules.iter().any(|rule| rule.is_active) => Err(AppError::CancellationNotAllowed),
        None => Ok(()),
        Some(required_hours) => {
            if reservation.start_at - now < Duration::hours(required_hours) {
                Err(AppError::CancellationWindowExpired { required_hours })
            } else {
                Ok(())
            }
        }
    }
}

fn active_rules(rules: &[ReservationRule]) -> impl Iterator<Item = &ReservationRule> {
    rules.iter().filter(|rule| rule.is_active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        id::{AreaId, PropertyId, ReservationId, RuleId, UserId},
        reservation::{ReservationArea, ReservationStatus},
    };
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap()
    }

    fn rule() -> ReservationRule {
        ReservationRule {
            id: RuleId::new(),
            area_id: AreaId::new(),
            allow_cancellation: true,
            cancellation_hours: 24,
            min_duration_minutes: Some(30),
            max_duration_minutes: Some(240),
            max_advance_days: Some(30),
            max_attendees: Some(20),
            is_active: true,
        }
    }

    fn area(rules: Vec<ReservationRule>) -> CommonArea {
        CommonArea {
            id: AreaId::new(),
            name: "バーベキュー場".into(),
            description: None,
            capacity: 30,
            requires_approval: true,
            has_fee: false,
            fee_amount: None,
            is_active: true,
            availability: None,
            rules,
        }
    }

    fn reservation_starting_in(hours: i64) -> Reservation {
        let start = now() + Duration::hours(hours);
        Reservation {
            id: ReservationId::new(),
            area: ReservationArea {
                area_id: AreaId::new(),
                name: "バーベキュー場".into(),
            },
            reserved_by: UserId::new(),
            property_id: PropertyId::new(),
            title: "test".into(),
            description: None,
            start_at: start,
            end_at: start + Duration::hours(2),
            status: ReservationStatus::Approved,
            attendees: 4,
            requires_payment: false,
            payment_amount: None,
            payment_status: None,
            rejection_reason: None,
            approved_by: None,
            approved_at: None,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn request_within_all_limits_passes() {
        let start = now() + Duration::days(1);
        let result = validate(&area(vec![rule()]), start, start + Duration::hours(2), 10, now());
        assert!(result.is_ok());
    }

    #[test]
    fn inactive_area_is_rejected_before_any_rule_check() {
        let mut area = area(vec![rule()]);
        area.is_active = false;
        let start = now() + Duration::days(1);
        let err = validate(&area, start, start + Duration::hours(2), 10, now()).unwrap_err();
        assert!(matches!(err, AppError::ResourceInactive(name) if name == "バーベキュー場"));
    }

    #[test]
    fn duration_outside_rule_bounds_is_a_policy_violation() {
        let start = now() + Duration::days(1);
        let too_short =
            validate(&area(vec![rule()]), start, start + Duration::minutes(15), 4, now())
                .unwrap_err();
        assert!(matches!(
            too_short,
            AppError::PolicyViolation(PolicyViolation::DurationOutOfRange {
                actual_minutes: 15,
                min_minutes: Some(30),
                max_minutes: Some(240),
            })
        ));

        let too_long =
            validate(&area(vec![rule()]), start, start + Duration::hours(5), 4, now()).unwrap_err();
        assert!(matches!(
            too_long,
            AppError::PolicyViolation(PolicyViolation::DurationOutOfRange { actual_minutes: 300, .. })
        ));
    }

    #[test]
    fn attendee_limit_comes_from_the_rule() {
        let start = now() + Duration::days(1);
        let err =
            validate(&area(vec![rule()]), start, start + Duration::hours(2), 21, now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::PolicyViolation(PolicyViolation::AttendeeLimitExceeded {
                attendees: 21,
                max_attendees: 20,
            })
        ));
    }

    #[test]
    fn non_positive_attendee_count_is_rejected() {
        let start = now() + Duration::days(1);
        // ルールの有無にかかわらず 0 人以下の予約は成立しない
        let err = validate(&area(vec![]), start, start + Duration::hours(2), 0, now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::PolicyViolation(PolicyViolation::InvalidAttendeeCount { attendees: 0 })
        ));
    }

    #[test]
    fn start_in_past_is_rejected() {
        let start = now() - Duration::hours(1);
        let err =
            validate(&area(vec![rule()]), start, start + Duration::hours(2), 4, now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::PolicyViolation(PolicyViolation::StartInPast)
        ));
    }

    #[test]
    fn booking_too_far_ahead_exceeds_the_advance_window() {
        let start = now() + Duration::days(31);
        let err =
            validate(&area(vec![rule()]), start, start + Duration::hours(2), 4, now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::PolicyViolation(PolicyViolation::AdvanceWindowExceeded { max_advance_days: 30 })
        ));
    }

    #[test]
    fn inactive_rules_are_ignored() {
        let mut inactive = rule();
        inactive.is_active = false;
        inactive.max_attendees = Some(1);
        let start = now() + Duration::days(60);
        // 非アクティブなルールしかなければ制限なし
        assert!(validate(&area(vec![inactive]), start, start + Duration::hours(8), 50, now()).is_ok());
    }

    #[test]
    fn cancellation_inside_the_notice_window_is_refused() {
        // 24 時間前までのルールに対し、開始 10 時間前のキャンセルは不可
        let err = can_cancel(&[rule()], &reservation_starting_in(10), now(), false).unwrap_err();
        assert!(matches!(
            err,
            AppError::CancellationWindowExpired { required_hours: 24 }
        ));

        assert!(can_cancel(&[rule()], &reservation_starting_in(48), now(), false).is_ok());
    }

    #[test]
    fn rule_forbidding_cancellation_wins_without_override() {
        let mut no_cancel = rule();
        no_cancel.allow_cancellation = false;
        let err =
            can_cancel(&[no_cancel.clone()], &reservation_starting_in(48), now(), false).unwrap_err();
        assert!(matches!(err, AppError::CancellationNotAllowed));

        // 管理側の操作はポリシーの対象外
        assert!(can_cancel(&[no_cancel], &reservation_starting_in(1), now(), true).is_ok());
    }

    #[test]
    fn shortest_notice_among_permitting_rules_applies() {
        let mut lenient = rule();
        lenient.cancellation_hours = 2;
        let err = can_cancel(
            &[rule(), lenient],
            &reservation_starting_in(1),
            now(),
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::CancellationWindowExpired { required_hours: 2 }
        ));
    }

    #[test]
    fn no_rules_means_cancellation_is_free() {
        assert!(can_cancel(&[], &reservation_starting_in(1), now(), false).is_ok());
    }
}
