// ==========================================
// 机场查询服务 - 参考数据导入器实现
// ==========================================
// 职责: 整合导入流程，从导入源到数据库
// 流程: 存在性检查 → 解析 → 类型转换 → 映射 → 按 国家/城市/机场 顺序 upsert
// 约束: 同一数据集内并发写入；前一数据集全部完成后才开始下一个
// ==========================================

use crate::domain::{ImportOutcome, ImportSummary};
use crate::importer::cell_value::{RawRow, SourceRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{
    FieldMapper as DefaultFieldMapper, AIRPORTS_SHEET, CITIES_SHEET, COUNTRIES_SHEET,
};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::reference_importer_trait::{
    FieldMapper, ReferenceFileParser, ReferenceImporter, ValueCaster,
};
use crate::importer::value_caster::ValueCaster as DefaultValueCaster;
use crate::perf::{PerfGuard, PerfOp};
use crate::repository::{ReferenceDataRepository, RepositoryResult};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

// ==========================================
// ReferenceImporterImpl - 参考数据导入器实现
// ==========================================
pub struct ReferenceImporterImpl<R>
where
    R: ReferenceDataRepository,
{
    // 数据访问层
    repo: R,

    // 导入源（Excel 工作簿或 CSV 目录）
    source_path: PathBuf,

    // 导入组件
    file_parser: Box<dyn ReferenceFileParser>,
    value_caster: Box<dyn ValueCaster>,
    field_mapper: Box<dyn FieldMapper>,
}

impl<R> ReferenceImporterImpl<R>
where
    R: ReferenceDataRepository,
{
    /// 创建新的导入器实例
    ///
    /// # 参数
    /// - repo: 参考数据仓储
    /// - source_path: 导入源路径
    /// - file_parser: 导入源解析器
    /// - value_caster: 单元格类型转换器
    /// - field_mapper: 字段映射器
    pub fn new(
        repo: R,
        source_path: impl Into<PathBuf>,
        file_parser: Box<dyn ReferenceFileParser>,
        value_caster: Box<dyn ValueCaster>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            repo,
            source_path: source_path.into(),
            file_parser,
            value_caster,
            field_mapper,
        }
    }

    /// 使用默认组件创建（按路径自动选择 Excel / CSV 目录解析）
    pub fn with_defaults(repo: R, source_path: impl Into<PathBuf>) -> Self {
        Self::new(
            repo,
            source_path,
            Box::new(UniversalFileParser),
            Box::new(DefaultValueCaster),
            Box::new(DefaultFieldMapper),
        )
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// 类型转换 + 映射；业务主键缺失的行跳过并计数
    fn prepare<T>(
        &self,
        sheet: &str,
        rows: Vec<SourceRow>,
        imported_at: DateTime<Utc>,
        skipped_rows: &mut usize,
        map: impl Fn(&RawRow, usize) -> ImportResult<T>,
    ) -> ImportResult<Vec<T>> {
        let mut records = Vec::with_capacity(rows.len());
        for SourceRow { row_number, cells } in rows {
            let cast = self.value_caster.cast_row(cells, imported_at);
            match map(&cast, row_number) {
                Ok(record) => records.push(record),
                Err(ImportError::MissingBusinessId { .. }) => {
                    warn!(sheet = sheet, row_number = row_number, "业务主键缺失，跳过该行");
                    *skipped_rows += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }
}

/// 汇总一个数据集的并发写入结果；任一失败即整体失败
fn settle_stage(stage: &str, results: Vec<RepositoryResult<()>>) -> ImportResult<usize> {
    let total = results.len();
    let failures: Vec<_> = results.into_iter().filter_map(Result::err).collect();

    if let Some(first) = failures.first() {
        error!(
            stage = stage,
            failed = failures.len(),
            total = total,
            error = %first,
            "数据集写入失败"
        );
        return Err(ImportError::BatchFailure {
            stage: stage.to_string(),
            failed: failures.len(),
            total,
            message: first.to_string(),
        });
    }

    info!(stage = stage, count = total, "数据集写入完成");
    Ok(total)
}

#[async_trait::async_trait]
impl<R> ReferenceImporter for ReferenceImporterImpl<R>
where
    R: ReferenceDataRepository,
{
    #[instrument(skip(self), fields(run_id))]
    async fn import(&self) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let imported_at = Utc::now();
        let run_id = Uuid::new_v4().to_string();
        Span::current().record("run_id", run_id.as_str());

        // === 步骤 1: 存在性检查 ===
        let existing_countries = self.repo.count_countries().await?;
        if existing_countries > 0 {
            info!(existing_countries, "参考数据已存在，跳过导入");
            return Ok(ImportOutcome::Skipped { existing_countries });
        }

        info!(source = %self.source_path.display(), "开始导入参考数据");

        // === 步骤 2: 解析导入源 ===
        debug!("步骤 2: 解析导入源");
        let parse_perf = PerfGuard::new(PerfOp::ImportParse);
        let sheets = self
            .file_parser
            .parse_reference_sheets(&self.source_path)
            .map_err(|e| {
                error!(error = %e, "导入源解析失败");
                e
            })?;
        let mut sql_statements = parse_perf.finish().sql_count;
        info!(
            countries = sheets.countries.len(),
            cities = sheets.cities.len(),
            airports = sheets.airports.len(),
            "导入源解析完成"
        );

        let mut skipped_rows = 0;

        // === 步骤 3: 国家 ===
        let perf = PerfGuard::new(PerfOp::ImportStage(COUNTRIES_SHEET));
        let countries = self.prepare(
            COUNTRIES_SHEET,
            sheets.countries,
            imported_at,
            &mut skipped_rows,
            |row, n| self.field_mapper.map_country(row, n),
        )?;
        let results = join_all(countries.into_iter().map(|c| self.repo.upsert_country(c))).await;
        let country_count = settle_stage(COUNTRIES_SHEET, results)?;
        sql_statements += perf.finish().sql_count;

        // === 步骤 4: 城市 ===
        let perf = PerfGuard::new(PerfOp::ImportStage(CITIES_SHEET));
        let cities = self.prepare(
            CITIES_SHEET,
            sheets.cities,
            imported_at,
            &mut skipped_rows,
            |row, n| self.field_mapper.map_city(row, n),
        )?;
        let results = join_all(cities.into_iter().map(|c| self.repo.upsert_city(c))).await;
        let city_count = settle_stage(CITIES_SHEET, results)?;
        sql_statements += perf.finish().sql_count;

        // === 步骤 5: 机场 ===
        let perf = PerfGuard::new(PerfOp::ImportStage(AIRPORTS_SHEET));
        let airports = self.prepare(
            AIRPORTS_SHEET,
            sheets.airports,
            imported_at,
            &mut skipped_rows,
            |row, n| self.field_mapper.map_airport(row, n, imported_at),
        )?;
        let results = join_all(airports.into_iter().map(|a| self.repo.upsert_airport(a))).await;
        let airport_count = settle_stage(AIRPORTS_SHEET, results)?;
        sql_statements += perf.finish().sql_count;

        let summary = ImportSummary {
            run_id,
            countries: country_count,
            cities: city_count,
            airports: airport_count,
            skipped_rows,
            sql_statements,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };
        info!(
            countries = summary.countries,
            cities = summary.cities,
            airports = summary.airports,
            skipped_rows = summary.skipped_rows,
            sql_statements = summary.sql_statements,
            elapsed_ms = summary.elapsed_ms,
            "参考数据导入完成"
        );

        Ok(ImportOutcome::Imported(summary))
    }
}
