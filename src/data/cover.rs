//! Pure functions over transaction covers.

use bit_vec::BitVec;

use super::{Count, Cover, ItemIndex};

/// Cover of the empty item set: every transaction
pub fn full_cover( nb_transactions: usize ) -> Cover {
    Cover::from_bit_vec( BitVec::from_elem( nb_transactions, true ))
}

/// Intersects the covers of the given items.
/// Pre: every index is valid for `covers`
pub fn cover_of<I>( covers: &[Cover], nb_transactions: usize, indices: I ) -> Cover where
    I: IntoIterator<Item = ItemIndex>
{
    let mut indices = indices.into_iter();
    match indices.next() {
	None => full_cover( nb_transactions ),
	Some( first ) => {
	    let mut cover = covers[ first ].clone();
	    for index in indices {
		cover.intersect_with( &covers[ index ] );
		if cover.is_empty() {
		    break; // cannot shrink any further
		}
	    }
	    cover
	}
    }
}

/// Size of the intersection without materializing it
pub fn intersection_size( a: &Cover, b: &Cover ) -> Count {
    a.intersection( b ).count() as Count
}

pub fn support( cover: &Cover ) -> Count {
    cover.len() as Count
}
