use crate::infra::{is_unclassified, load_records, parse_now, StaticExamSource};
use chrono::{Duration, Local, NaiveDateTime};
use clap::Args;
use exam_board::config::{AppConfig, RoutingConfig};
use exam_board::error::AppError;
use exam_board::postings::{
    ExamDate, ExamRecord, ExamResult, GroupView, PostingService, RecordView, RouteQuery,
    RouteResolver, ViewItems, ViewMode, ViewModel, ViewModelBuilder, ViewParams, ViewStats,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ViewArgs {
    /// JSON file holding an array of exam records
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Municipality the view is built for
    #[arg(long)]
    pub(crate) municipality: String,
    /// card, list, table, summary, or detail
    #[arg(long)]
    pub(crate) style: Option<String>,
    /// Exam type filter; required for the detail style
    #[arg(long)]
    pub(crate) exam_type: Option<String>,
    /// Evaluation instant (defaults to now)
    #[arg(long, value_parser = parse_now)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Print the view model as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation instant (defaults to now)
    #[arg(long, value_parser = parse_now)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Print view models as JSON instead of text reports
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_view(args: ViewArgs) -> Result<(), AppError> {
    let ViewArgs {
        input,
        municipality,
        style,
        exam_type,
        now,
        json,
    } = args;

    let config = AppConfig::load()?;
    let builder = ViewModelBuilder::from_config(&config.routing);
    let records = load_records(&input)?;
    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let mode = ViewMode::from_style(style.as_deref(), exam_type);

    let model = builder.build(&records, ViewParams::new(municipality, mode, now))?;
    emit(&model, json)
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { now, json } = args;
    let now = now.unwrap_or_else(|| Local::now().naive_local());

    let service = PostingService::new(
        StaticExamSource::new(sample_postings(now)),
        ViewModelBuilder::from_config(&RoutingConfig::default()),
        RouteResolver::default(),
    );

    println!("Exam board demo ({})", now.format("%Y-%m-%d %H:%M"));

    for municipality in ["川越市", "札幌市"] {
        println!();
        let summary = service.view(municipality, ViewMode::Summary, now).await?;
        emit(&summary, json)?;

        let Some(first_link) = summary
            .items
            .groups()
            .and_then(|groups| groups.first())
            .map(|group| group.link.clone())
        else {
            continue;
        };

        println!("\nFollowing {first_link}");
        let (route, detail) = service
            .detail(&first_link, &RouteQuery::default(), now)
            .await?;
        println!("  resolved via {:?}", route.origin);
        emit(&detail, json)?;
    }

    println!("\nLegacy path /koumuin_shiken/sapporo/");
    let (route, detail) = service
        .detail("/koumuin_shiken/sapporo/", &RouteQuery::default(), now)
        .await?;
    println!(
        "  resolved via {:?} -> {} / {}",
        route.origin, route.municipality, route.exam_type
    );
    emit(&detail, json)
}

fn emit(model: &ViewModel, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(model)?);
    } else {
        print!("{}", render_view(model));
    }
    Ok(())
}

pub(crate) fn render_view(model: &ViewModel) -> String {
    let mut out = format!("{}\n", model.title);

    match &model.stats {
        ViewStats::Flat {
            record_count,
            total_recruits,
            average_ratio,
        } => out.push_str(&format!(
            "{record_count}件 | 採用予定 {total_recruits}名 | 平均倍率 {average_ratio:.1}倍\n"
        )),
        ViewStats::Summary {
            group_count,
            total_positions,
        } => out.push_str(&format!(
            "{group_count}区分 | 採用予定 {total_positions}名\n"
        )),
    }

    if model.no_results {
        out.push_str("  該当する試験情報はありません\n");
        return out;
    }

    match &model.items {
        ViewItems::Groups(groups) => groups.iter().for_each(|group| render_group(&mut out, group)),
        ViewItems::Records(records) => records
            .iter()
            .for_each(|record| render_record(&mut out, record)),
    }

    if let Some(url) = &model.official_url {
        out.push_str(&format!("  公式サイト: {url}\n"));
    }
    out
}

fn display_type(exam_type: &str) -> &str {
    if is_unclassified(exam_type) {
        "未分類"
    } else {
        exam_type
    }
}

fn render_group(out: &mut String, group: &GroupView) {
    out.push_str(&format!(
        "- {} [{}] {}件 / 募集{}名 (募集中 {} / 募集前 {})\n",
        display_type(&group.exam_type),
        group.status_label,
        group.record_count,
        group.total_positions,
        group.active_count,
        group.upcoming_count,
    ));
    if let Some(latest) = &group.latest_exam_date {
        out.push_str(&format!("    最新試験日 {latest}\n"));
    }
    out.push_str(&format!("    -> {}\n", group.link));
}

fn render_record(out: &mut String, record: &RecordView) {
    out.push_str(&format!(
        "- {} ({}) [{}] {} | 採用予定 {}名\n",
        record.position,
        display_type(&record.exam_type),
        record.status_label,
        record.urgency_label,
        record.recruit_label,
    ));
    if let Some(period) = &record.application_period {
        out.push_str(&format!("    申込期間 {period}\n"));
    }
    for entry in &record.schedule {
        out.push_str(&format!("    {} {}\n", entry.label, entry.date));
    }
    for stage in &record.tests {
        out.push_str(&format!("    {}: {}\n", stage.label, stage.content));
    }
    if let Some(result) = &record.latest_result {
        out.push_str(&format!(
            "    {} 倍率 {:.1}倍 ({}人受験 / {}人合格)\n",
            result.year, result.ratio, result.applicants, result.successful
        ));
    }
}

fn day(now: NaiveDateTime, offset: i64) -> Option<ExamDate> {
    Some(ExamDate::from_date((now + Duration::days(offset)).date()))
}

fn outcome(year: &str, applicants: u32, successful: u32) -> ExamResult {
    let ratio = if successful == 0 {
        0.0
    } else {
        (f64::from(applicants) / f64::from(successful) * 10.0).round() / 10.0
    };
    ExamResult {
        year: year.to_string(),
        applicants,
        successful,
        ratio,
    }
}

/// Postings placed around `now` so every lifecycle state shows up.
pub(crate) fn sample_postings(now: NaiveDateTime) -> Vec<ExamRecord> {
    let mut kawagoe_admin = ExamRecord::new("川越市", "一般行政職");
    kawagoe_admin.exam_type = Some("行政職員採用試験".to_string());
    kawagoe_admin.recruit_number = Some(15);
    kawagoe_admin.age_requirement = Some("22歳以上30歳以下".to_string());
    kawagoe_admin.application_start = day(now, -10);
    kawagoe_admin.application_end = day(now, 5);
    kawagoe_admin.exam_date = day(now, 40);
    kawagoe_admin.first_test = Some("教養試験・適性検査".to_string());
    kawagoe_admin.second_test = Some("個別面接".to_string());
    kawagoe_admin.official_url = Some("https://www.city.kawagoe.saitama.jp/".to_string());
    kawagoe_admin.results = vec![outcome("令和5年度", 310, 38), outcome("令和6年度", 284, 40)];

    let mut kawagoe_civil = ExamRecord::new("川越市", "土木");
    kawagoe_civil.exam_type = Some("行政職員採用試験".to_string());
    kawagoe_civil.recruit_number = Some(4);
    kawagoe_civil.application_end = day(now, -20);
    kawagoe_civil.exam_date = day(now, 12);

    let mut kawagoe_nurse = ExamRecord::new("川越市", "保健師");
    kawagoe_nurse.exam_type = Some("資格免許職採用試験".to_string());
    kawagoe_nurse.recruit_number = Some(2);
    kawagoe_nurse.application_end = day(now, -60);
    kawagoe_nurse.exam_date = day(now, -30);
    kawagoe_nurse.results = vec![outcome("令和6年度", 18, 3)];

    let kawagoe_seasonal = ExamRecord::new("川越市", "会計年度任用職員（事務補助）");

    let mut sapporo_admin = ExamRecord::new("札幌市", "一般事務（行政コース）");
    sapporo_admin.exam_type = Some("職員採用試験（大学の部・一般方式）".to_string());
    sapporo_admin.recruit_number = Some(60);
    sapporo_admin.application_start = day(now, 3);
    sapporo_admin.application_end = day(now, 25);
    sapporo_admin.exam_date = day(now, 55);
    sapporo_admin.first_test = Some("筆記試験".to_string());
    sapporo_admin.results = vec![outcome("令和6年度", 520, 71)];

    vec![
        kawagoe_admin,
        kawagoe_civil,
        kawagoe_nurse,
        kawagoe_seasonal,
        sapporo_admin,
    ]
}
