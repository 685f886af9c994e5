use std::collections::{HashMap, HashSet};

use contracts::domain::sales_record::CanonicalSalesRecord;
use contracts::projections::p901_sales_summary::{
    CategorySummaryRow, CitySummaryRow, DealerSummaryRow, OverallStats, StateSummaryRow,
};

/// Общая статистика по выборке
///
/// Суммы считаются в f64; округление применяется только к итоговой
/// выручке. Сырой report_data проходит насквозь в `data`.
pub fn overall(records: &[CanonicalSalesRecord]) -> OverallStats {
    let mut total_revenue = 0.0f64;
    let mut total_quantity = 0.0f64;
    let mut dealers: HashSet<&str> = HashSet::new();
    let mut products: HashSet<&str> = HashSet::new();

    for r in records {
        total_revenue += r.value.unwrap_or(0.0);
        total_quantity += r.qty.unwrap_or(0.0);
        if !r.dealer.is_empty() {
            dealers.insert(r.dealer.as_str());
        }
        if !r.product.is_empty() {
            products.insert(r.product.as_str());
        }
    }

    OverallStats {
        total_revenue: (total_revenue * 100.0).round() / 100.0,
        total_quantity: total_quantity.trunc() as i64,
        total_orders: records.len() as u64,
        distinct_dealers: dealers.len(),
        distinct_products: products.len(),
        data: records.iter().map(|r| r.raw.clone()).collect(),
    }
}

// Аккумулятор одной группы; rows хранятся в порядке первого появления
// ключа, финальная сортировка стабильна, поэтому равные суммы сохраняют
// этот порядок
struct GroupAcc {
    context: String,
    total_sales: f64,
    total_quantity: f64,
    transaction_count: u64,
}

fn group_by<K>(records: &[CanonicalSalesRecord], key_of: K) -> Vec<(String, GroupAcc)>
where
    K: Fn(&CanonicalSalesRecord) -> (&str, &str),
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, GroupAcc)> = Vec::new();

    for r in records {
        let (key, context) = key_of(r);
        let i = *index.entry(key.to_string()).or_insert_with(|| {
            groups.push((
                key.to_string(),
                GroupAcc {
                    // Контекст первой записи группы
                    context: context.to_string(),
                    total_sales: 0.0,
                    total_quantity: 0.0,
                    transaction_count: 0,
                },
            ));
            groups.len() - 1
        });

        let acc = &mut groups[i].1;
        // Запись учитывается в числе транзакций независимо от валидности чисел
        acc.transaction_count += 1;
        if let Some(v) = r.value {
            acc.total_sales += v;
        }
        if let Some(q) = r.qty {
            acc.total_quantity += q;
        }
    }

    groups.sort_by(|a, b| {
        b.1.total_sales
            .partial_cmp(&a.1.total_sales)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    groups
}

/// Сводка по дилерам, сортировка по выручке по убыванию
pub fn by_dealer(records: &[CanonicalSalesRecord]) -> Vec<DealerSummaryRow> {
    group_by(records, |r| (r.dealer.as_str(), ""))
        .into_iter()
        .map(|(key, acc)| DealerSummaryRow {
            dealer_name: key,
            total_sales: acc.total_sales,
            total_quantity: acc.total_quantity,
            transaction_count: acc.transaction_count,
        })
        .collect()
}

/// Сводка по штатам
pub fn by_state(records: &[CanonicalSalesRecord]) -> Vec<StateSummaryRow> {
    group_by(records, |r| (r.state.as_str(), ""))
        .into_iter()
        .map(|(key, acc)| StateSummaryRow {
            state: key,
            total_sales: acc.total_sales,
            total_quantity: acc.total_quantity,
            transaction_count: acc.transaction_count,
        })
        .collect()
}

/// Сводка по городам; штат берётся из первой записи города
pub fn by_city(records: &[CanonicalSalesRecord]) -> Vec<CitySummaryRow> {
    group_by(records, |r| (r.city.as_str(), r.state.as_str()))
        .into_iter()
        .map(|(key, acc)| CitySummaryRow {
            city: key,
            state: acc.context,
            total_sales: acc.total_sales,
            total_quantity: acc.total_quantity,
            transaction_count: acc.transaction_count,
        })
        .collect()
}

// Ключ с наибольшим числом записей; при равенстве побеждает первый
// встретившийся ключ
fn top_by_count<K>(records: &[CanonicalSalesRecord], key_of: K) -> Option<(String, u64)>
where
    K: Fn(&CanonicalSalesRecord) -> &str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();

    for r in records {
        let key = key_of(r);
        let i = *index.entry(key).or_insert_with(|| {
            counts.push((key, 0));
            counts.len() - 1
        });
        counts[i].1 += 1;
    }

    let mut best: Option<(&str, u64)> = None;
    for (key, n) in counts {
        match best {
            Some((_, top)) if n <= top => {}
            _ => best = Some((key, n)),
        }
    }
    best.map(|(key, n)| (key.to_string(), n))
}

/// Штат с наибольшим числом записей, для карточек дашборда
pub fn top_state_by_count(records: &[CanonicalSalesRecord]) -> Option<(String, u64)> {
    top_by_count(records, |r| r.state.as_str())
}

/// Город с наибольшим числом записей
pub fn top_city_by_count(records: &[CanonicalSalesRecord]) -> Option<(String, u64)> {
    top_by_count(records, |r| r.city.as_str())
}

/// Дилер с наибольшим числом записей
pub fn top_dealer_by_count(records: &[CanonicalSalesRecord]) -> Option<(String, u64)> {
    top_by_count(records, |r| r.dealer.as_str())
}

/// Сводка по категориям товара; parent_category из первой записи товара
pub fn by_category(records: &[CanonicalSalesRecord]) -> Vec<CategorySummaryRow> {
    group_by(records, |r| (r.product.as_str(), r.parent_category.as_str()))
        .into_iter()
        .map(|(key, acc)| CategorySummaryRow {
            product: key,
            parent_category: acc.context,
            total_sales: acc.total_sales,
            total_quantity: acc.total_quantity,
            transaction_count: acc.transaction_count,
        })
        .collect()
}
