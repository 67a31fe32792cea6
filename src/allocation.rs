//! Page allocation engine.
//!
//! Pinned lectures keep their pinned count. The pages left after prefaces and
//! pinned lectures are shared by the unpinned lectures as evenly as possible,
//! with earlier lectures taking the extra page when the split is uneven.
//!
//! Pinned counts are not range checked, so all page arithmetic is checked and
//! fails with [`Error::PageOverflow`]. Edits that would leave a config whose
//! page ranges cannot be computed are rolled back.

use crate::models::{Allocation, BookConfig};
use crate::{Error, Result};

/// How the derived allocation relates to the pages actually available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    /// Every available page is assigned to exactly one lecture.
    Exact,
    /// Pinned lectures claim more pages than the textbook has.
    Overallocated { pinned: i64, available: i64 },
    /// Pages remain but every lecture is pinned.
    Unallocated { remaining: i64 },
}

/// Derive the per-lecture page counts from `config`.
pub fn recompute(config: &BookConfig) -> Result<Allocation> {
    let remainder = config
        .available_pages()
        .checked_sub(config.pinned_pages()?)
        .ok_or(Error::PageOverflow)?;
    let unpinned = config.confirmed.iter().filter(|c| c.is_none()).count() as i64;

    let (base, extra) = if unpinned == 0 || remainder <= 0 {
        (0, 0)
    } else {
        (remainder / unpinned, remainder % unpinned)
    };

    let mut seen = 0;
    let pages = config
        .confirmed
        .iter()
        .map(|pinned| match pinned {
            Some(count) => *count,
            None => {
                seen += 1;
                if seen <= extra { base + 1 } else { base }
            }
        })
        .collect();

    tracing::debug!(base, extra, unpinned, remainder, "recomputed allocation");
    Ok(Allocation { pages })
}

/// Compare a derived allocation against the pages `config` has to give out.
pub fn balance(config: &BookConfig, allocation: &Allocation) -> Result<Balance> {
    let available = config.available_pages();
    let pinned = config.pinned_pages()?;
    let total = allocation.total()?;
    if pinned > available {
        Ok(Balance::Overallocated { pinned, available })
    } else if total < available {
        Ok(Balance::Unallocated {
            remaining: available.checked_sub(total).ok_or(Error::PageOverflow)?,
        })
    } else {
        Ok(Balance::Exact)
    }
}

/// First and last page of lecture `index`, or `(0, 0)` when it has no pages.
pub fn page_range(allocation: &Allocation, prefaces: i64, index: usize) -> Result<(i64, i64)> {
    if allocation.get(index) == 0 {
        return Ok((0, 0));
    }
    let start = prefaces
        .checked_add(allocation.pages_before(index)?)
        .and_then(|before| before.checked_add(1))
        .ok_or(Error::PageOverflow)?;
    let end = end_page(allocation, prefaces, index)?;
    Ok((start, end))
}

/// Last page lecture `index` would cover, even when its count is zero.
pub fn end_page(allocation: &Allocation, prefaces: i64, index: usize) -> Result<i64> {
    prefaces
        .checked_add(allocation.pages_before(index + 1)?)
        .ok_or(Error::PageOverflow)
}

/// Verify every figure derived from `config` is computable.
pub fn check(config: &BookConfig) -> Result<()> {
    let allocation = recompute(config)?;
    for index in 0..allocation.len() {
        page_range(&allocation, config.prefaces, index)?;
        // the next lecture starts one page later
        end_page(&allocation, config.prefaces, index)?
            .checked_add(1)
            .ok_or(Error::PageOverflow)?;
    }
    balance(config, &allocation)?;
    Ok(())
}

/// Pin lecture `index` to `value` pages. The value is not range checked.
pub fn pin(config: &mut BookConfig, index: usize, value: i64) -> Result<()> {
    check_index(config, index)?;
    commit(config, |confirmed| confirmed[index] = Some(value))?;
    tracing::info!(lecture = index + 1, pages = value, "pinned lecture");
    Ok(())
}

/// Return lecture `index` to the derived split.
pub fn unpin(config: &mut BookConfig, index: usize) -> Result<()> {
    check_index(config, index)?;
    commit(config, |confirmed| confirmed[index] = None)?;
    tracing::info!(lecture = index + 1, "unpinned lecture");
    Ok(())
}

/// Pin lecture `index` so that its range ends on `end_page`.
///
/// Returns the pinned page count.
pub fn pin_by_end_page(
    config: &mut BookConfig,
    allocation: &Allocation,
    index: usize,
    end_page: i64,
) -> Result<i64> {
    check_index(config, index)?;
    let count = count_ending_at(config, allocation, index, end_page)?;
    pin(config, index, count)?;
    Ok(count)
}

/// Like [`pin_by_end_page`], but also pins the following lecture so that its
/// end page does not move. Only its start page follows `end_page`.
///
/// The following lecture is pinned whether or not it was pinned before. On the
/// last lecture this is the same as [`pin_by_end_page`].
pub fn pin_by_end_page_keep_next(
    config: &mut BookConfig,
    allocation: &Allocation,
    index: usize,
    end_page: i64,
) -> Result<i64> {
    check_index(config, index)?;
    let count = count_ending_at(config, allocation, index, end_page)?;

    let next = index + 1;
    let next_count = if next < config.lectures() {
        let delta = count
            .checked_sub(allocation.get(index))
            .ok_or(Error::PageOverflow)?;
        Some(
            allocation
                .get(next)
                .checked_sub(delta)
                .ok_or(Error::PageOverflow)?,
        )
    } else {
        None
    };

    commit(config, |confirmed| {
        confirmed[index] = Some(count);
        if let Some(next_count) = next_count {
            confirmed[next] = Some(next_count);
        }
    })?;
    tracing::info!(
        lecture = index + 1,
        pages = count,
        ?next_count,
        "pinned lecture keeping next end page"
    );
    Ok(count)
}

fn count_ending_at(
    config: &BookConfig,
    allocation: &Allocation,
    index: usize,
    end_page: i64,
) -> Result<i64> {
    end_page
        .checked_sub(config.prefaces)
        .and_then(|count| count.checked_sub(allocation.pages_before(index).ok()?))
        .ok_or(Error::PageOverflow)
}

/// Apply `update` to the pinned counts, restoring them if the result fails
/// [`check`].
fn commit(config: &mut BookConfig, update: impl FnOnce(&mut [Option<i64>])) -> Result<()> {
    let previous = config.confirmed.clone();
    update(config.confirmed.as_mut_slice());
    if let Err(e) = check(config) {
        tracing::debug!(error = %e, "rolled back pinned counts");
        config.confirmed = previous;
        return Err(e);
    }
    Ok(())
}

fn check_index(config: &BookConfig, index: usize) -> Result<()> {
    if index >= config.lectures() {
        return Err(Error::InvalidArgument(format!(
            "lecture {} is out of range (1-{})",
            index + 1,
            config.lectures()
        )));
    }
    Ok(())
}
